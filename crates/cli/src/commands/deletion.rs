//! Deletion workflow commands

use anyhow::Result;
use std::path::Path;
use trafdesk_business::{DeletionService, ServiceContext};

use crate::db;
use crate::DeletionAction;

pub async fn handle(db_path: &Path, acting_as: Option<&str>, action: DeletionAction) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let actor = db::resolve_actor(&pool, acting_as).await?;
    let ctx = ServiceContext::new(pool.clone());
    let service = DeletionService::new(&ctx);

    match action {
        DeletionAction::Request { offense_id, reason } => {
            let request = service.submit(&actor, &offense_id, &reason, None).await?;
            println!("✅ Deletion request submitted:");
            println!("   Request ID: {}", request.id);
            println!("   Offense:    {}", request.offense_id);
            println!("   Reason:     {}", request.reason);
            println!("   Awaiting superadmin review.");
        }

        DeletionAction::Resolve { request_id, decision } => {
            let request = service.resolve(&actor, &request_id, &decision, None).await?;
            println!("✅ Request {} {}", request.id, request.status.as_str());
        }

        DeletionAction::List => {
            let views = service.list(&actor).await?;
            if views.is_empty() {
                println!("No deletion requests.");
                pool.close().await;
                return Ok(());
            }
            for view in views {
                let requester = view
                    .requester_email
                    .as_deref()
                    .unwrap_or("(account removed)");
                println!("• {} [{}]", view.request.id, view.request.status.as_str());
                println!("    Offense:   {}", view.request.offense_id);
                println!("    By:        {}", requester);
                println!("    Reason:    {}", view.request.reason);
                println!(
                    "    Snapshot:  {} / {} / {}",
                    view.request.snapshot.driver_name,
                    view.request.snapshot.vehicle_number,
                    view.request.snapshot.offence_type.as_str()
                );
                if view.offense.is_none() {
                    println!("    Offense has been deleted.");
                }
            }
        }
    }

    pool.close().await;
    Ok(())
}
