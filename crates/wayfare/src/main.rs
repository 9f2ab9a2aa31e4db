use std::env;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::{LevelFilter, debug, info};
use serde_json::json;

use wayfare::client::ApiClient;
use wayfare::flows::auth::{LoginForm, SignupForm};
use wayfare::flows::bookings::DELETE_PROMPT;
use wayfare::flows::catalog::{PackageFilter, PackageForm, PriceBand, suggestions};
use wayfare::flows::{admin, auth, bookings, catalog, profile};
use wayfare::nav::NavBar;
use wayfare::protocol::AccountRole;
use wayfare::routes::{BOOKING_CONFIRMATION_PATH, HOME_PATH, Navigation, Navigator, Params, View};
use wayfare::session::{FileStore, Session, SessionState};
use wayfare::settings::{self, APP_NAME, AppConfig, AppPaths};

mod render;

fn main() {
    if let Err(err) = try_main() {
        let _ = writeln!(io::stderr(), "{err:?}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn async_main(ctx: RuntimeContext, command: Command) -> Result<()> {
    handle_page_command(&ctx, command).await
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = RuntimeContext::new(cli.common.clone())?;
    ctx.init_logging()?;
    debug!("resolved paths: {}", ctx.paths);

    match cli.command {
        Command::Logout => handle_logout(&ctx),
        Command::Whoami => handle_whoami(&ctx),
        Command::Menu => handle_menu(&ctx),
        Command::Config { command } => handle_config(&ctx, command),
        Command::Completions { shell } => handle_completions(shell),
        command => async_main(ctx, command),
    }
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Wayfare - browse and book travel packages from the terminal.",
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    common: CommonOpts,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Args)]
struct CommonOpts {
    /// Override the config file path
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Reduce output to only errors
    #[arg(short, long, action = clap::ArgAction::SetTrue, global = true)]
    quiet: bool,
    /// Increase logging verbosity (stackable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Enable debug logging (equivalent to -vv)
    #[arg(long, global = true)]
    debug: bool,
    /// Enable trace logging (overrides other levels)
    #[arg(long, global = true)]
    trace: bool,
    /// Output machine readable JSON
    #[arg(long, global = true)]
    json: bool,
    /// Disable ANSI colors in output
    #[arg(long = "no-color", global = true, conflicts_with = "color")]
    no_color: bool,
    /// Control color output (auto, always, never)
    #[arg(long, value_enum, default_value_t = ColorOption::Auto, global = true)]
    color: ColorOption,
    /// Assume "yes" for interactive prompts
    #[arg(short = 'y', long = "yes", global = true)]
    assume_yes: bool,
    /// Emit additional diagnostics for troubleshooting
    #[arg(long = "diagnostics", global = true)]
    diagnostics: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorOption {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the session
    Login(LoginCommand),
    /// Create an account
    Signup(SignupCommand),
    /// Sign out and clear the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Show the navigation menu for the current session
    Menu,
    /// Navigate to a path and render the page there
    Open {
        /// Path such as /packages or /book-package/123
        path: String,
    },
    /// Show featured packages
    Home,
    /// Browse and filter packages
    Packages(PackagesCommand),
    /// Show one package
    Package {
        /// Package ID
        id: String,
    },
    /// Book a package
    Book(BookCommand),
    /// List your bookings
    Bookings,
    /// Publish a package (hotel owners)
    AddPackage(AddPackageCommand),
    /// Platform statistics (administrators)
    Dashboard,
    /// List every booking (administrators)
    AllBookings {
        /// Show traveler details for this booking
        #[arg(long, value_name = "ID")]
        expand: Option<String>,
    },
    /// Delete a booking (administrators)
    DeleteBooking {
        /// Booking ID
        id: String,
    },
    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Inspect and manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Args)]
struct LoginCommand {
    #[arg(long)]
    email: String,
    /// Prompted for when omitted
    #[arg(long, env = "WAYFARE_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    /// user, hotelOwner or admin
    #[arg(long)]
    role: Option<AccountRole>,
}

#[derive(Debug, Clone, Args)]
struct SignupCommand {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    /// Prompted for when omitted
    #[arg(long, env = "WAYFARE_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    /// user, hotelOwner or admin
    #[arg(long)]
    role: Option<AccountRole>,
    /// Required for hotel owners
    #[arg(long)]
    hotel_name: Option<String>,
    /// Required for hotel owners
    #[arg(long)]
    hotel_location: Option<String>,
}

#[derive(Debug, Clone, Args)]
struct PackagesCommand {
    /// Match title or destination (case-insensitive)
    #[arg(long, default_value = "")]
    search: String,
    /// all, low (under 1000) or high
    #[arg(long, default_value = "all")]
    price: PriceBand,
}

#[derive(Debug, Clone, Args)]
struct BookCommand {
    /// Package ID
    id: String,
    /// Travel date (YYYY-MM-DD)
    #[arg(long)]
    date: String,
}

#[derive(Debug, Clone, Args)]
struct AddPackageCommand {
    #[arg(long)]
    title: String,
    #[arg(long)]
    destination: String,
    /// Left empty, the package is listed at 0
    #[arg(long, default_value = "")]
    price: String,
    #[arg(long, default_value = "")]
    duration: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Image URL
    #[arg(long, default_value = "")]
    image: String,
}

#[derive(Debug, Subcommand)]
enum ProfileCommand {
    /// Show your profile
    Show,
    /// Change profile fields
    Update {
        /// Field to set, by its API name (e.g. companyName=Acme)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value, required = true)]
        fields: Vec<(String, String)>,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Output the effective configuration
    Show,
    /// Print the resolved config file path
    Path,
    /// Regenerate the default configuration file
    Reset,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw}"))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in {raw}"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

#[derive(Debug, Clone)]
struct RuntimeContext {
    common: CommonOpts,
    paths: AppPaths,
    config: AppConfig,
    navigator: Navigator,
}

impl RuntimeContext {
    fn new(common: CommonOpts) -> Result<Self> {
        let paths = AppPaths::discover(common.config.clone())?;
        let config = settings::load_or_init_config(&paths.config_file)
            .with_context(|| format!("loading config from {}", paths.config_file.display()))?;
        let paths = paths.apply_overrides(&config)?;
        let ctx = Self {
            common,
            paths,
            config,
            navigator: Navigator::default(),
        };
        ctx.ensure_directories()?;
        Ok(ctx)
    }

    fn init_logging(&self) -> Result<()> {
        use tracing_subscriber::fmt::writer::BoxMakeWriter;
        use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

        if self.common.quiet {
            log::set_max_level(LevelFilter::Off);
            return Ok(());
        }

        let level = match self.effective_log_level() {
            LevelFilter::Off => "off",
            LevelFilter::Error => "error",
            LevelFilter::Warn => "warn",
            LevelFilter::Info => "info",
            LevelFilter::Debug => "debug",
            LevelFilter::Trace => "trace",
        };
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{APP_NAME}={level}")));

        let (writer, to_file) = match self.config.logging.file {
            Some(ref path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("opening log file {path}"))?;
                (BoxMakeWriter::new(Mutex::new(file)), true)
            }
            None => (BoxMakeWriter::new(io::stderr), false),
        };

        if self.common.json {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
                .try_init()
                .ok();
        } else {
            let force_color = matches!(self.common.color, ColorOption::Always)
                || env::var_os("FORCE_COLOR").is_some();
            let disable_color = to_file
                || self.common.no_color
                || matches!(self.common.color, ColorOption::Never)
                || env::var_os("NO_COLOR").is_some()
                || (!force_color && !io::stderr().is_terminal());

            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(!disable_color)
                        .with_target(self.common.diagnostics)
                        .with_file(self.common.diagnostics)
                        .with_line_number(self.common.diagnostics),
                )
                .try_init()
                .ok();
        }

        // The session file store logs through `log`.
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
        builder.filter_level(self.effective_log_level());
        builder.try_init().ok();

        Ok(())
    }

    /// Flags win over the configured level.
    fn effective_log_level(&self) -> LevelFilter {
        if self.common.trace {
            LevelFilter::Trace
        } else if self.common.debug {
            LevelFilter::Debug
        } else {
            match self.common.verbose {
                0 => self
                    .config
                    .logging
                    .level
                    .parse()
                    .unwrap_or(LevelFilter::Info),
                1 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        }
    }

    fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.paths.state_dir).with_context(|| {
            format!(
                "creating state directory {}",
                self.paths.state_dir.display()
            )
        })
    }

    fn session_state(&self) -> SessionState<FileStore> {
        SessionState::new(FileStore::new(self.paths.session_file()))
    }

    fn client(&self) -> Result<ApiClient> {
        ApiClient::with_timeout(&self.config.api.base_url, self.config.api.timeout())
            .context("creating API client")
    }

    /// Navigate to `path`, showing the navigation bar when the guard allows it.
    fn visit(&self, session: &Session, path: &str) -> Result<(View, Params)> {
        match self.navigator.navigate(session, path) {
            Navigation::Render { view, params } => {
                if !self.common.json {
                    render::nav_bar(&NavBar::compose(session), path);
                }
                Ok((view, params))
            }
            Navigation::Redirect { to } => Err(anyhow!("Redirecting to {to}")),
            Navigation::NotFound { path } => Err(anyhow!("no page at {path}")),
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{label}")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{question} [y/N] "))?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => prompt("Password: "),
    }
}

fn handle_logout(ctx: &RuntimeContext) -> Result<()> {
    let next = auth::logout(&ctx.session_state());
    if ctx.common.json {
        render::json(&json!({ "next": next }))
    } else {
        println!("Signed out.");
        Ok(())
    }
}

fn handle_whoami(ctx: &RuntimeContext) -> Result<()> {
    let session = ctx.session_state().read();
    if ctx.common.json {
        render::json(&json!({
            "authenticated": session.is_authenticated(),
            "email": session.email(),
            "role": session.role.account().map(|r| r.as_str()),
        }))
    } else {
        render::session(&session);
        Ok(())
    }
}

fn handle_menu(ctx: &RuntimeContext) -> Result<()> {
    let bar = NavBar::compose(&ctx.session_state().read());
    if ctx.common.json {
        render::json(&bar)
    } else {
        render::menu(&bar);
        Ok(())
    }
}

fn handle_config(ctx: &RuntimeContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            if ctx.common.json {
                render::json(&ctx.config)
            } else {
                print!(
                    "{}",
                    toml::to_string_pretty(&ctx.config).context("serializing config to TOML")?
                );
                Ok(())
            }
        }
        ConfigCommand::Path => {
            println!("{}", ctx.paths.config_file.display());
            Ok(())
        }
        ConfigCommand::Reset => {
            settings::write_default_config(&ctx.paths.config_file)?;
            info!("reset config at {}", ctx.paths.config_file.display());
            Ok(())
        }
    }
}

fn handle_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, APP_NAME, &mut io::stdout());
    Ok(())
}

async fn handle_page_command(ctx: &RuntimeContext, command: Command) -> Result<()> {
    let client = ctx.client()?;
    let state = ctx.session_state();
    let session = state.read();

    match command {
        Command::Login(cmd) => handle_login(ctx, &client, &state, cmd).await,
        Command::Signup(cmd) => handle_signup(ctx, &client, cmd).await,
        Command::Open { path } => {
            let (view, params) = ctx.visit(&session, &path)?;
            render_view(ctx, &client, &session, view, &params).await
        }
        Command::Home => {
            ctx.visit(&session, HOME_PATH)?;
            show_home(ctx, &client).await
        }
        Command::Packages(cmd) => {
            ctx.visit(&session, "/packages")?;
            show_packages(ctx, &client, &PackageFilter::new(cmd.search, cmd.price)).await
        }
        Command::Package { id } => {
            ctx.visit(&session, &book_path(&id))?;
            show_package(ctx, &client, &id).await
        }
        Command::Book(cmd) => handle_book(ctx, &client, &session, cmd).await,
        Command::Bookings => {
            ctx.visit(&session, "/my-bookings")?;
            show_my_bookings(ctx, &client, &session).await
        }
        Command::AddPackage(cmd) => {
            ctx.visit(&session, "/add-package")?;
            let form = PackageForm {
                title: cmd.title,
                destination: cmd.destination,
                price: cmd.price,
                duration: cmd.duration,
                description: cmd.description,
                image: cmd.image,
            };
            let message = catalog::add_package(&client, &session, form).await?;
            println!("{message}");
            Ok(())
        }
        Command::Dashboard => {
            ctx.visit(&session, "/admin-dashboard")?;
            show_dashboard(ctx, &client, &session).await
        }
        Command::AllBookings { expand } => {
            ctx.visit(&session, "/all-bookings")?;
            show_all_bookings(ctx, &client, &session, expand.as_deref()).await
        }
        Command::DeleteBooking { id } => handle_delete_booking(ctx, &client, &session, &id).await,
        Command::Profile { command } => {
            ctx.visit(&session, "/profile")?;
            match command {
                ProfileCommand::Show => show_profile(ctx, &client, &session).await,
                ProfileCommand::Update { fields } => {
                    let updated = profile::update_profile(&client, &session, &fields).await?;
                    if ctx.common.json {
                        render::json(&updated)
                    } else {
                        println!("{}", profile::UPDATED_MESSAGE);
                        Ok(())
                    }
                }
            }
        }
        Command::Logout
        | Command::Whoami
        | Command::Menu
        | Command::Config { .. }
        | Command::Completions { .. } => Err(anyhow!("command does not need the API")),
    }
}

fn book_path(id: &str) -> String {
    format!("/book-package/{id}")
}

async fn render_view(
    ctx: &RuntimeContext,
    client: &ApiClient,
    session: &Session,
    view: View,
    params: &Params,
) -> Result<()> {
    match view {
        View::Home => show_home(ctx, client).await,
        View::Packages => show_packages(ctx, client, &PackageFilter::default()).await,
        View::BookPackage => {
            let id = params
                .get("id")
                .ok_or_else(|| anyhow!("missing package id"))?;
            show_package(ctx, client, id).await
        }
        View::MyBookings => show_my_bookings(ctx, client, session).await,
        View::Profile => show_profile(ctx, client, session).await,
        View::AdminDashboard => show_dashboard(ctx, client, session).await,
        View::AllBookings => show_all_bookings(ctx, client, session, None).await,
        View::Login => notice("Sign in with `wayfare login --email <EMAIL> --role <ROLE>`."),
        View::Signup => notice("Create an account with `wayfare signup`."),
        View::AddPackage => notice("Publish a package with `wayfare add-package`."),
        View::HotelBookings => notice("Bookings for your packages are not available yet."),
        View::BookingConfirmation => notice("No booking to confirm."),
        View::ForgotPassword | View::ResetPassword | View::VerifyOtp => {
            notice("This page is only available in the web app.")
        }
    }
}

fn notice(text: &str) -> Result<()> {
    println!("{text}");
    Ok(())
}

async fn handle_login(
    ctx: &RuntimeContext,
    client: &ApiClient,
    state: &SessionState<FileStore>,
    cmd: LoginCommand,
) -> Result<()> {
    let form = LoginForm {
        password: password_or_prompt(cmd.password)?,
        email: cmd.email,
        role: cmd.role,
    };
    let next = auth::login(client, state, &form).await?;
    let session = state.read();

    if ctx.common.json {
        render::json(&json!({
            "email": session.email(),
            "role": session.role.account().map(|r| r.as_str()),
            "next": next,
        }))
    } else {
        println!(
            "Signed in as {} ({}).",
            session.email().unwrap_or("-"),
            session.role.label()
        );
        Ok(())
    }
}

async fn handle_signup(ctx: &RuntimeContext, client: &ApiClient, cmd: SignupCommand) -> Result<()> {
    let form = SignupForm {
        password: password_or_prompt(cmd.password)?,
        name: cmd.name,
        email: cmd.email,
        role: cmd.role,
        hotel_name: cmd.hotel_name,
        hotel_location: cmd.hotel_location,
    };
    let outcome = auth::signup(client, form).await?;

    if ctx.common.json {
        render::json(&json!({
            "email": outcome.email,
            "message": outcome.message,
            "next": outcome.redirect,
        }))
    } else {
        println!(
            "{}",
            outcome.message.as_deref().unwrap_or("Account created.")
        );
        println!(
            "Enter the code sent to {} to verify your account ({}).",
            outcome.email, outcome.redirect
        );
        Ok(())
    }
}

async fn handle_book(
    ctx: &RuntimeContext,
    client: &ApiClient,
    session: &Session,
    cmd: BookCommand,
) -> Result<()> {
    ctx.visit(session, &book_path(&cmd.id))?;
    let confirmation = bookings::book_package(client, session, &cmd.id, &cmd.date).await?;

    if ctx.common.json {
        return render::json(&confirmation);
    }
    ctx.visit(session, BOOKING_CONFIRMATION_PATH)?;
    render::confirmation(&confirmation);
    Ok(())
}

async fn handle_delete_booking(
    ctx: &RuntimeContext,
    client: &ApiClient,
    session: &Session,
    id: &str,
) -> Result<()> {
    ctx.visit(session, "/all-bookings")?;
    let mut ledger = bookings::all_bookings(client, session).await?;

    if !ctx.common.assume_yes && !confirm(DELETE_PROMPT)? {
        println!("Cancelled.");
        return Ok(());
    }

    ledger.delete(client, session, id).await?;
    if ctx.common.json {
        render::json(ledger.bookings())
    } else {
        println!("Booking deleted.");
        println!();
        render::ledger(&ledger);
        Ok(())
    }
}

async fn show_home(ctx: &RuntimeContext, client: &ApiClient) -> Result<()> {
    let featured = catalog::load_featured(client, ctx.config.catalog.sample_on_error).await?;
    if ctx.common.json {
        return render::json(&featured.packages);
    }
    println!("Featured packages");
    println!();
    let shown: Vec<_> = featured.packages.iter().collect();
    render::packages(&shown, featured.sample);
    Ok(())
}

async fn show_packages(ctx: &RuntimeContext, client: &ApiClient, filter: &PackageFilter) -> Result<()> {
    let loaded = catalog::load_catalog(client, ctx.config.catalog.sample_on_error).await?;
    let shown = filter.apply(&loaded.packages);
    if ctx.common.json {
        return render::json(&shown);
    }
    render::packages(&shown, loaded.sample);
    render::suggestions(&suggestions(&loaded.packages, &filter.search));
    Ok(())
}

async fn show_package(ctx: &RuntimeContext, client: &ApiClient, id: &str) -> Result<()> {
    let package = client
        .get_package(id)
        .await
        .with_context(|| format!("loading package {id}"))?;
    if ctx.common.json {
        render::json(&package)
    } else {
        render::package(&package);
        Ok(())
    }
}

async fn show_my_bookings(ctx: &RuntimeContext, client: &ApiClient, session: &Session) -> Result<()> {
    let list = bookings::my_bookings(client, session).await?;
    if ctx.common.json {
        render::json(&list)
    } else {
        render::my_bookings(&list);
        Ok(())
    }
}

async fn show_all_bookings(
    ctx: &RuntimeContext,
    client: &ApiClient,
    session: &Session,
    expand: Option<&str>,
) -> Result<()> {
    let mut ledger = bookings::all_bookings(client, session).await?;
    if let Some(id) = expand {
        ledger.toggle(id);
    }
    if ctx.common.json {
        render::json(ledger.bookings())
    } else {
        render::ledger(&ledger);
        Ok(())
    }
}

async fn show_dashboard(ctx: &RuntimeContext, client: &ApiClient, session: &Session) -> Result<()> {
    let shown = admin::dashboard(client, session, ctx.config.catalog.sample_on_error).await?;
    if ctx.common.json {
        render::json(&json!({ "stats": shown.stats, "sample": shown.sample }))
    } else {
        render::dashboard(&shown.stats, shown.sample);
        Ok(())
    }
}

async fn show_profile(ctx: &RuntimeContext, client: &ApiClient, session: &Session) -> Result<()> {
    let loaded = profile::load_profile(client, session).await?;
    if ctx.common.json {
        render::json(&loaded)
    } else {
        render::profile(&loaded);
        Ok(())
    }
}
