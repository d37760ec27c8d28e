//! User management commands

use anyhow::{bail, Result};
use std::path::Path;
use trafdesk_core::User;
use trafdesk_persistence::UserRepo;

use crate::db;
use crate::UserAction;

pub async fn handle(db_path: &Path, action: UserAction) -> Result<()> {
    let pool = db::connect(db_path).await?;

    match action {
        UserAction::Create { name, email, role } => {
            if UserRepo::get_by_email(&pool, &email).await?.is_some() {
                bail!("A user with email '{email}' already exists");
            }
            let user = User::new(&name, &email, "", role.to_core());
            UserRepo::insert(&pool, &user).await?;
            println!("✅ Registered {} user:", user.role);
            println!("   ID:    {}", user.id);
            println!("   Name:  {}", user.name);
            println!("   Email: {}", user.email);
        }
        UserAction::List => {
            let users = UserRepo::get_all(&pool).await?;
            if users.is_empty() {
                println!("No users found.");
            } else {
                println!("{:<38} {:<20} {:<28} {:<10}", "ID", "NAME", "EMAIL", "ROLE");
                println!("{}", "-".repeat(98));
                for user in users {
                    println!(
                        "{:<38} {:<20} {:<28} {:<10}",
                        user.id, user.name, user.email, user.role
                    );
                }
            }
        }
    }

    pool.close().await;
    Ok(())
}
