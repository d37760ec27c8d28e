//! Audit log command

use anyhow::Result;
use std::path::Path;
use trafdesk_business::{audit, ServiceContext};

use crate::db;

pub async fn show(db_path: &Path, acting_as: Option<&str>, limit: i64) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let actor = db::resolve_actor(&pool, acting_as).await?;
    let ctx = ServiceContext::new(pool.clone());

    let entries = audit::list_recent(&ctx, &actor, limit).await?;
    if entries.is_empty() {
        println!("Audit log is empty.");
    } else {
        for entry in entries {
            println!(
                "{}  {:<28} user={}  {}",
                entry.timestamp.to_rfc3339(),
                entry.action.as_str(),
                entry.user_id,
                entry.details
            );
        }
    }

    pool.close().await;
    Ok(())
}
