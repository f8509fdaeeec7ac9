//! Account commands: sign in, register, sign out.

use clap::Subcommand;
use shopmint_storefront::Storefront;

#[derive(Subcommand)]
pub enum AccountAction {
    /// Sign in with email and password
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show the signed-in account
    Me,
    /// Sign out
    Logout,
}

pub async fn run(
    engine: &mut Storefront,
    action: AccountAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AccountAction::Login { email, password } => {
            let user = engine.login(&email, &password).await?;
            println!("Signed in as {}", user.email);
        }
        AccountAction::Register {
            email,
            password,
            name,
        } => {
            let user = engine.register(&email, &password, name).await?;
            println!("Welcome, {}", user.name.as_deref().unwrap_or("friend"));
        }
        AccountAction::Me => match engine.current_user() {
            Some(user) => {
                println!("#{} {}", user.id, user.email);
                if let Some(name) = &user.name {
                    println!("{name}");
                }
            }
            None => println!("Not signed in"),
        },
        AccountAction::Logout => {
            engine.logout();
            println!("Signed out");
        }
    }
    Ok(())
}
