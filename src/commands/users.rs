use colored::Colorize;
use tabled::Tabled;

use reqres::error::Result;
use reqres::{User, UserDirectoryClient};

use crate::output::{self, field};

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "First name")]
    first_name: String,
    #[tabled(rename = "Last name")]
    last_name: String,
    #[tabled(rename = "Email")]
    email: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

pub async fn show(client: &UserDirectoryClient, id: i64) -> Result<()> {
    let user = client.get_user_by_id(id).await?;

    output::print_item(&user, |user| {
        println!("{}", user.full_name().bold());
        println!("{}", field("ID", &user.id.to_string()));
        println!("{}", field("Email", &user.email));
        if let Some(avatar) = &user.avatar {
            println!("{}", field("Avatar", avatar));
        }
    });

    Ok(())
}

pub async fn list(client: &UserDirectoryClient, page: u32) -> Result<()> {
    let users = client.get_all_users(page).await?;

    if users.is_empty() {
        output::print_message(&format!("No users from page {page} onwards."));
        return Ok(());
    }

    output::print_heading(&format!("Users from page {page} ({})", users.len()));
    output::print_table(&users, UserRow::from);

    Ok(())
}
