//! Offense commands

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use trafdesk_business::{NewOffense, OffenseService, OffenseUpdate, ServiceContext};
use trafdesk_core::Offense;

use crate::db;
use crate::OffenseAction;

pub async fn handle(db_path: &Path, acting_as: Option<&str>, action: OffenseAction) -> Result<()> {
    let pool = db::connect(db_path).await?;
    let actor = db::resolve_actor(&pool, acting_as).await?;
    let ctx = ServiceContext::new(pool.clone());
    let service = OffenseService::new(&ctx);

    match action {
        OffenseAction::Record {
            driver,
            vehicle,
            offence_type,
            location,
            fine,
            date,
        } => {
            let date = date
                .map(|d| {
                    DateTime::parse_from_rfc3339(&d)
                        .map(|dt| dt.with_timezone(&Utc))
                        .context("Invalid --date, expected RFC 3339")
                })
                .transpose()?;

            let offense = service
                .create(
                    &actor,
                    NewOffense {
                        driver_email: driver,
                        vehicle_number: vehicle,
                        offence_type: offence_type.to_core(),
                        location,
                        date,
                        fine,
                    },
                    None,
                )
                .await?;
            println!("✅ Offense recorded:");
            print_offense(&offense);
        }

        OffenseAction::List => {
            let offenses = service.list(&actor).await?;
            if offenses.is_empty() {
                println!("No offenses found.");
            } else {
                println!(
                    "{:<38} {:<24} {:<12} {:<14} {:>10} {:<8}",
                    "ID", "DRIVER", "VEHICLE", "TYPE", "FINE", "STATUS"
                );
                println!("{}", "-".repeat(110));
                for o in offenses {
                    println!(
                        "{:<38} {:<24} {:<12} {:<14} {:>10} {:<8}",
                        o.id,
                        o.driver_email,
                        o.vehicle_number,
                        o.offence_type.as_str(),
                        o.fine.to_string(),
                        o.status.as_str()
                    );
                }
            }
        }

        OffenseAction::Show { offense_id } => {
            let offense = service.get(&actor, &offense_id).await?;
            println!("📋 Offense Details");
            print_offense(&offense);
        }

        OffenseAction::Edit {
            offense_id,
            vehicle,
            offence_type,
            location,
            fine,
        } => {
            let offense = service
                .update(
                    &actor,
                    &offense_id,
                    OffenseUpdate {
                        vehicle_number: vehicle,
                        offence_type: offence_type.map(|t| t.to_core()),
                        location,
                        date: None,
                        fine,
                    },
                    None,
                )
                .await?;
            println!("✅ Offense updated:");
            print_offense(&offense);
        }

        OffenseAction::SetStatus { offense_id, status } => {
            let offense = service
                .update_status(&actor, &offense_id, status.to_core(), None)
                .await?;
            println!("✅ Offense {} is now {}", offense.id, offense.status.as_str());
        }
    }

    pool.close().await;
    Ok(())
}

fn print_offense(offense: &Offense) {
    println!("   ID:       {}", offense.id);
    println!("   Driver:   {} <{}>", offense.driver_name, offense.driver_email);
    println!("   Vehicle:  {}", offense.vehicle_number);
    println!("   Type:     {}", offense.offence_type.as_str());
    println!("   Location: {}", offense.location);
    println!("   Date:     {}", offense.date.to_rfc3339());
    println!("   Fine:     {}", offense.fine);
    println!("   Status:   {}", offense.status.as_str());
    if offense.deletion_requested {
        println!("   ⚠️  Deletion requested");
    }
}
