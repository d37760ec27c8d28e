//! Payment commands

use anyhow::Result;
use std::path::Path;
use trafdesk_business::{PaymentService, ServiceContext};

use crate::db;
use crate::MethodArg;

pub async fn pay(
    db_path: &Path,
    acting_as: Option<&str>,
    offense_id: &str,
    method: MethodArg,
) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let actor = db::resolve_actor(&pool, acting_as).await?;
    let ctx = ServiceContext::new(pool.clone());

    let payment = PaymentService::new(&ctx)
        .submit(&actor, offense_id, method.to_core())
        .await?;

    println!("✅ Payment recorded:");
    println!("   Payment ID: {}", payment.id);
    println!("   Offense:    {}", payment.offense_id);
    println!("   Amount:     {}", payment.amount);
    println!("   Method:     {}", payment.method.as_str());

    pool.close().await;
    Ok(())
}

pub async fn list(db_path: &Path, acting_as: Option<&str>) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let actor = db::resolve_actor(&pool, acting_as).await?;
    let ctx = ServiceContext::new(pool.clone());

    let payments = PaymentService::new(&ctx).list(&actor).await?;
    if payments.is_empty() {
        println!("No payments found.");
    } else {
        println!(
            "{:<38} {:<24} {:>10} {:<14} {:<10}",
            "ID", "DRIVER", "AMOUNT", "METHOD", "STATUS"
        );
        println!("{}", "-".repeat(100));
        for p in payments {
            println!(
                "{:<38} {:<24} {:>10} {:<14} {:<10}",
                p.id,
                p.driver_email,
                p.amount.to_string(),
                p.method.as_str(),
                p.status.as_str()
            );
        }
    }

    pool.close().await;
    Ok(())
}
