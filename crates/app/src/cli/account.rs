use buckery::routes::Area;
use buckery_app::{
    auth::RegisterRequest,
    context::AppContext,
    pages::{LoginPage, Navbar, ProfilePage, RegisterPage},
};
use clap::Args;

use super::failed;

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Account username
    #[arg(long)]
    username: String,

    /// Account password
    #[arg(long, env = "BUCKERY_PASSWORD", hide_env_values = true)]
    password: String,

    /// Sign in to the back office instead of the storefront
    #[arg(long)]
    admin: bool,

    /// Keep the session in local storage as well as the cookie
    #[arg(long)]
    remember: bool,
}

#[derive(Debug, Args)]
pub(crate) struct RegisterArgs {
    /// Full name
    #[arg(long)]
    name: String,

    /// Username
    #[arg(long)]
    username: String,

    /// Email address
    #[arg(long)]
    email: String,

    /// Password
    #[arg(long, env = "BUCKERY_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Args)]
pub(crate) struct ProfileArgs {
    /// New phone number
    #[arg(long)]
    phone: Option<String>,

    /// New address
    #[arg(long)]
    address: Option<String>,

    /// New notes
    #[arg(long)]
    notes: Option<String>,
}

pub(crate) async fn login(context: &AppContext, args: LoginArgs) -> Result<(), String> {
    let area = if args.admin {
        Area::Admin
    } else {
        Area::Storefront
    };

    let page = LoginPage::new(context, area);

    if !page.mount() {
        println!("already signed in");
        return Ok(());
    }

    if !page.submit(&args.username, &args.password, args.remember).await {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    let session = context.sessions.current();
    if let (Some(username), Some(role)) = (session.username(), session.role()) {
        println!("signed in as {username} ({role})");
    }

    Ok(())
}

pub(crate) async fn register(context: &AppContext, args: RegisterArgs) -> Result<(), String> {
    let page = RegisterPage::new(context);

    let request = RegisterRequest::new(args.name, args.username, args.email, args.password);

    if !page.submit(request).await {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    println!("account created, sign in to continue");

    Ok(())
}

pub(crate) async fn logout(context: &AppContext) -> Result<(), String> {
    let navbar = Navbar::new(context);

    if !navbar.is_authenticated() {
        println!("not signed in");
        return Ok(());
    }

    if !navbar.logout().await {
        return Err(failed(navbar.error(), context.navigator.as_ref()));
    }

    println!("signed out");

    Ok(())
}

pub(crate) async fn whoami(context: &AppContext) -> Result<(), String> {
    let page = ProfilePage::new(context);

    if !page.mount().await {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    let Some(profile) = page.profile() else {
        return Err("profile unavailable".to_string());
    };

    println!("username: {}", profile.username);
    println!("name: {}", profile.nama_lengkap);
    println!("email: {}", profile.email);
    println!("phone: {}", profile.phone);
    println!("address: {}", profile.address);
    println!("cart items: {}", Navbar::new(context).cart_badge());

    Ok(())
}

pub(crate) async fn profile(context: &AppContext, args: ProfileArgs) -> Result<(), String> {
    let page = ProfilePage::new(context);

    if !page.mount().await {
        return Err(failed(page.error(), context.navigator.as_ref()));
    }

    page.start_editing();
    page.edit(|form| {
        if let Some(phone) = args.phone {
            form.phone = phone;
        }
        if let Some(address) = args.address {
            form.address = address;
        }
        if let Some(notes) = args.notes {
            form.notes = notes;
        }
    });

    if !page.save().await {
        let errors = page.field_errors();

        if errors.is_empty() {
            return Err(failed(page.error(), context.navigator.as_ref()));
        }

        return Err(errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"));
    }

    if let Some(notice) = page.notice() {
        println!("{notice}");
    }

    Ok(())
}
