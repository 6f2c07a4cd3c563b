//! claims-cli - terminal front-end for the claims workbench
//!
//! # Usage
//!
//! ```bash
//! claims-cli login adjuster@example.com password123
//! claims-cli claims --status IN_REVIEW --status SUBMITTED --page 2
//! claims-cli show 0190b1c2-...
//! claims-cli transition 0190b1c2-... INFO_REQUESTED Need the police report
//! claims-cli new-claim --policy 0190... --date 2024-06-02 --type WATER_DAMAGE \
//!     --description "Pipe burst in the kitchen" --item "FURNITURE:450:Oak table" --file receipt.pdf
//! claims-cli assign 0190b1c2-... 0190aaaa-... URGENT
//! claims-cli note 0190b1c2-... --internal Called the contractor
//! claims-cli workbench --priority URGENT
//! claims-cli reports --from 2024-01-01 --to 2024-06-30 --csv
//! claims-cli users list --role ADJUSTER
//! claims-cli users add --email new@example.com --name "New Adjuster" --role ADJUSTER
//! ```
//!
//! # Environment Variables
//!
//! * `CLAIMS_BASE_URL` - Backend base URL (default: http://localhost:8080/api)
//! * `CLAIMS_TIMEOUT_SECS` - Request timeout (default: 30)
//! * `CLAIMS_LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! * `CLAIMS_SESSION_FILE` - Where the login is kept (default: .claims-session.json)

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::format::{format_date, format_date_time, format_file_size, format_relative, truncate_text};
use core_kernel::{ClaimId, PolicyId, UserId};
use domain_access::{navigation_for, quick_actions_for, LoginForm, NewUser, User, UserDirectory, UserRole, UserUpdate};
use domain_claims::submission::mime_type_for;
use domain_claims::workbench::PREVIEW_LEN;
use domain_claims::{
    export_csv, AssignmentRequest, Claim, ClaimFilters, ClaimItemDraft, ClaimPermissions, ClaimStatus, ClaimWizard,
    IncidentType, ItemCategory, NewNote, NoteVisibility, PendingAttachment, Priority, Queue, ReportRange,
    WizardStep, WorkbenchFilter, WorkbenchScope,
};
use interface_api::{ApiClient, ApiError, ClaimsDesk, ClientConfig, Notice, NoticeLevel, SessionStore};

const DEFAULT_SESSION_FILE: &str = ".claims-session.json";

#[derive(Debug, Parser)]
#[command(name = "claims-cli", author, version, about = "Terminal front-end for the claims workbench", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login { email: String, password: String },
    /// End the session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List claims
    Claims {
        /// Only claims in this status (repeatable)
        #[arg(long)]
        status: Vec<ClaimStatus>,
        /// Only claims assigned with this priority (repeatable)
        #[arg(long)]
        priority: Vec<Priority>,
        /// Only claims on this product line (repeatable)
        #[arg(long)]
        product: Vec<String>,
        /// Free-text search
        #[arg(long)]
        search: Option<String>,
        /// Filed on or after (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Filed on or before (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one claim
    Show { claim_id: ClaimId },
    /// Change a claim's status
    Transition {
        claim_id: ClaimId,
        target: ClaimStatus,
        /// Reason recorded with the change
        reason: Vec<String>,
    },
    /// File a new claim and submit it
    NewClaim {
        #[arg(long)]
        policy: PolicyId,
        /// Incident date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        #[arg(long = "type")]
        incident_type: IncidentType,
        #[arg(long)]
        description: String,
        /// Damaged item as CATEGORY:COST:DESCRIPTION (repeatable)
        #[arg(long = "item", value_name = "ITEM", value_parser = parse_item)]
        items: Vec<ClaimItemDraft>,
        /// Supporting document to upload (repeatable)
        #[arg(long = "file", value_name = "PATH")]
        files: Vec<PathBuf>,
    },
    /// Assign a claim to an adjuster
    Assign {
        claim_id: ClaimId,
        adjuster_id: UserId,
        priority: Priority,
    },
    /// Add a note to a claim
    Note {
        claim_id: ClaimId,
        /// Staff-only note
        #[arg(long)]
        internal: bool,
        #[arg(required = true)]
        body: Vec<String>,
    },
    /// Queues for adjusters and supervisors
    Workbench {
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        status: Option<ClaimStatus>,
    },
    /// SLA and dashboard figures
    Reports {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Print the report as CSV
        #[arg(long)]
        csv: bool,
    },
    /// List and manage users
    Users {
        #[command(subcommand)]
        action: Option<UserCommand>,
    },
    /// Menu entries for your role
    Nav,
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// List users
    List {
        #[arg(long)]
        role: Option<UserRole>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a user
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        role: UserRole,
    },
    /// Change a user's details
    Edit {
        user_id: UserId,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<UserRole>,
    },
    /// Delete a user
    Rm { user_id: UserId },
}

/// Parses `CATEGORY:COST:DESCRIPTION`
fn parse_item(value: &str) -> Result<ClaimItemDraft, String> {
    let mut parts = value.splitn(3, ':');
    let (Some(category), Some(cost), Some(description)) = (parts.next(), parts.next(), parts.next()) else {
        return Err("expected CATEGORY:COST:DESCRIPTION".to_string());
    };
    let category: ItemCategory = category.parse()?;
    let estimated_cost = cost
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid cost `{}`: {}", cost, e))?;
    Ok(ClaimItemDraft {
        category: Some(category),
        description: description.trim().to_string(),
        estimated_cost,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_level);

    match run(&config, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", describe(&e));
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber; `RUST_LOG` wins over the configured level
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api) if api.is_unauthorized() => {
            format!("{}. Please log in again with `claims-cli login`.", api.user_message())
        }
        Some(api) => api.user_message(),
        None => format!("{:#}", err),
    }
}

async fn run(config: &ClientConfig, command: Commands) -> Result<()> {
    let session_file = config
        .session_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
    let client = ApiClient::new(config, SessionStore::persistent(session_file).await)?;

    match command {
        Commands::Login { email, password } => login(&client, email, password).await,
        Commands::Logout => {
            client.logout().await?;
            println!("Logged out");
            Ok(())
        }
        Commands::Whoami => whoami(&client).await,
        Commands::Claims {
            status,
            priority,
            product,
            search,
            from,
            to,
            page,
            limit,
        } => {
            let mut filters = ClaimFilters::new().between(from, to);
            for status in status {
                filters = filters.with_status(status);
            }
            for priority in priority {
                filters = filters.with_priority(priority);
            }
            for product in product {
                filters = filters.with_product(product);
            }
            if let Some(search) = search {
                filters = filters.with_search(search);
            }
            list_claims(&client, filters, page, limit).await
        }
        Commands::Show { claim_id } => show_claim(&client, claim_id).await,
        Commands::Transition {
            claim_id,
            target,
            reason,
        } => {
            let reason = (!reason.is_empty()).then(|| reason.join(" "));
            transition(&client, claim_id, target, reason).await
        }
        Commands::NewClaim {
            policy,
            date,
            incident_type,
            description,
            items,
            files,
        } => {
            let mut wizard = ClaimWizard::new();
            let draft = wizard.draft_mut();
            draft.policy_id = Some(policy);
            draft.incident_date = Some(date);
            draft.incident_type = Some(incident_type);
            draft.description = description;
            draft.items = items;
            for path in &files {
                wizard.attach(read_attachment(path).await?)?;
            }
            new_claim(&client, wizard).await
        }
        Commands::Assign {
            claim_id,
            adjuster_id,
            priority,
        } => {
            let request = AssignmentRequest {
                claim_id,
                adjuster_id,
                priority,
            };
            let mut desk = desk(&client).await?;
            let result = desk.assign(request).await;
            print_notices(desk.take_notices());
            let assignment = result?;
            println!("Due {}", format_date_time(&assignment.due_at));
            Ok(())
        }
        Commands::Note {
            claim_id,
            internal,
            body,
        } => {
            let note = NewNote {
                body: body.join(" "),
                visibility: if internal { NoteVisibility::Internal } else { NoteVisibility::Public },
            };
            let mut desk = desk(&client).await?;
            let result = desk.add_note(claim_id, note).await;
            print_notices(desk.take_notices());
            result.map(|_| ()).map_err(Into::into)
        }
        Commands::Workbench { priority, status } => workbench(&client, WorkbenchFilter { priority, status }).await,
        Commands::Reports { from, to, csv } => reports(&client, ReportRange::new(from, to)?, csv).await,
        Commands::Users { action } => {
            let action = action.unwrap_or(UserCommand::List { role: None, search: None });
            users(&client, action).await
        }
        Commands::Nav => nav(&client).await,
    }
}

async fn current_user(client: &ApiClient) -> Result<User> {
    client
        .session()
        .user()
        .await
        .ok_or_else(|| anyhow!("Not logged in. Run `claims-cli login <email> <password>` first."))
}

async fn desk(client: &ApiClient) -> Result<ClaimsDesk> {
    let user = current_user(client).await?;
    Ok(ClaimsDesk::new(Arc::new(client.clone()), user))
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => println!("✓ {}", notice.message),
            NoticeLevel::Error => eprintln!("✗ {}", notice.message),
        }
    }
}

async fn login(client: &ApiClient, email: String, password: String) -> Result<()> {
    let session = client.login(&LoginForm { email, password }).await?;
    println!("Login successful!");
    println!("Welcome, {} ({})", session.user.display_name, session.user.role.label());
    if let Some(expires) = session.expires_at() {
        println!("Session expires {}", format_relative(&expires, &Utc::now()));
    }
    Ok(())
}

async fn whoami(client: &ApiClient) -> Result<()> {
    current_user(client).await?;
    let user = client.me().await?;
    println!("{} <{}>", user.display_name, user.email);
    println!("Role:          {}", user.role.label());
    println!("Member since:  {}", format_date(user.created_at.date_naive()));
    Ok(())
}

async fn list_claims(client: &ApiClient, filters: ClaimFilters, page: Option<u32>, limit: Option<u32>) -> Result<()> {
    let mut desk = desk(client).await?;
    desk.set_filters(filters);
    if let Some(limit) = limit {
        desk.set_limit(limit);
    }
    if let Some(page) = page {
        desk.set_page(page);
    }
    desk.load().await?;

    if desk.claims().is_empty() {
        println!("No claims found");
        return Ok(());
    }
    println!(
        "{:<12} {:<18} {:<20} {:<15} {:<8} {:>14}  {}",
        "CLAIM", "TYPE", "CLAIMANT", "STATUS", "PRIORITY", "AMOUNT", "FILED"
    );
    for claim in desk.claims() {
        println!(
            "{:<12} {:<18} {:<20} {:<15} {:<8} {:>14}  {}",
            claim.id.short(),
            truncate_text(&claim.incident_type, 18),
            truncate_text(claim.claimant_name(), 20),
            claim.status.label(),
            claim.priority().map_or("-", |p| p.label()),
            claim.amount_claimed_money().map_or_else(|| "-".to_string(), |m| m.format()),
            format_date(claim.created_at.date_naive()),
        );
    }
    let pagination = desk.pagination();
    println!();
    println!("{}", pagination.summary());
    if pagination.is_multi_page() {
        println!("Page {} of {}", pagination.page, pagination.total_pages);
    }
    Ok(())
}

fn print_claim(claim: &Claim, viewer: &User) {
    let now = Utc::now();
    let perms = ClaimPermissions::new(Some(viewer));

    println!("Claim {}", claim.id);
    println!("Status:        {}", claim.status.label());
    if let Some(policy) = &claim.policy {
        println!("Policy:        {}", policy.option_label());
    }
    println!("Claimant:      {}", claim.claimant_name());
    println!("Incident:      {} on {}", claim.incident_type, format_date(claim.incident_date));
    if let Some(description) = &claim.description {
        println!("Description:   {}", description);
    }
    if let Some(amount) = claim.amount_claimed_money() {
        println!("Claimed:       {}", amount.format());
    }
    if let Some(amount) = claim.amount_approved_money() {
        println!("Approved:      {}", amount.format());
    }
    if let Some(assignment) = &claim.assignment {
        let adjuster = assignment
            .adjuster
            .as_ref()
            .map_or_else(|| assignment.adjuster_id.to_string(), |a| a.display_name.clone());
        let overdue = if assignment.is_overdue(now) { " (overdue)" } else { "" };
        println!(
            "Assigned to:   {} [{}], due {}{}",
            adjuster,
            assignment.priority.label(),
            format_date_time(&assignment.due_at),
            overdue
        );
    }
    println!("Filed:         {}", format_relative(&claim.created_at, &now));

    if !claim.items.is_empty() {
        println!();
        println!("Items (total {}):", claim.total_estimated_cost().format());
        for item in &claim.items {
            println!("  - {} / {}: {}", item.category, item.description, item.estimated_cost);
        }
    }
    if !claim.attachments.is_empty() {
        println!();
        println!("Attachments:");
        for attachment in &claim.attachments {
            println!(
                "  - {} ({}, {})",
                attachment.file_name,
                attachment.kind().label(),
                format_file_size(attachment.size)
            );
        }
    }
    let notes: Vec<_> = claim.visible_notes(perms.can_read_internal_notes()).collect();
    if !notes.is_empty() {
        println!();
        println!("Notes:");
        for note in notes {
            let author = note.author.as_ref().map_or("Unknown", |a| a.display_name.as_str());
            println!("  [{}] {}: {}", format_relative(&note.created_at, &now), author, note.body);
        }
    }

    let transitions = claim.available_transitions(viewer.role);
    if !transitions.is_empty() {
        println!();
        let names: Vec<&str> = transitions.iter().map(|s| s.as_str()).collect();
        println!("You can move this claim to: {}", names.join(", "));
    }
}

async fn show_claim(client: &ApiClient, id: ClaimId) -> Result<()> {
    let mut desk = desk(client).await?;
    let claim = desk.open(id).await?.clone();
    print_claim(&claim, desk.user());
    Ok(())
}

async fn transition(client: &ApiClient, id: ClaimId, target: ClaimStatus, reason: Option<String>) -> Result<()> {
    let mut desk = desk(client).await?;
    let result = desk.change_status(id, target, reason).await;
    print_notices(desk.take_notices());
    result.map(|_| ()).map_err(Into::into)
}

/// Reads a file from disk as an upload, typing it by extension
async fn read_attachment(path: &Path) -> Result<PendingAttachment> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("`{}` has no file name", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Cannot read {}", path.display()))?;
    Ok(PendingAttachment::from_bytes(file_name, mime_type_for(file_name), bytes))
}

/// Walks the wizard to the review step, then creates and submits the claim
async fn new_claim(client: &ApiClient, mut wizard: ClaimWizard) -> Result<()> {
    while wizard.step() != WizardStep::Review {
        let step = wizard.step();
        wizard
            .next()
            .map_err(|errors| anyhow!("{} is incomplete: {}", step.name(), errors))?;
    }
    let submission = wizard.submit().map_err(ApiError::from)?;

    let mut desk = desk(client).await?;
    let result = desk.submit(submission).await;
    print_notices(desk.take_notices());
    let claim = result?;
    println!("Claim {} is {}", claim.id, claim.status.label());
    if let Some(amount) = claim.amount_claimed_money() {
        println!("Claimed:       {}", amount.format());
    }
    println!("Attachments:   {}", claim.attachments.len());
    Ok(())
}

async fn workbench(client: &ApiClient, filter: WorkbenchFilter) -> Result<()> {
    let mut desk = desk(client).await?;
    if !matches!(desk.user().role, UserRole::Adjuster | UserRole::Supervisor) {
        bail!("The workbench is for adjusters and supervisors");
    }
    desk.load_workbench(filter).await?;

    let now = Utc::now();
    let bench = desk.workbench(now);
    let counts = bench.counts();
    println!("{}", WorkbenchScope::for_user(desk.user()).title());
    println!(
        "Total {} | Urgent {} | Pending review {} | Awaiting info {} | Overdue {}",
        counts.total, counts.urgent, counts.pending_review, counts.awaiting_info, counts.overdue
    );
    for queue in Queue::ALL {
        let claims = bench.preview(queue, PREVIEW_LEN);
        println!();
        println!("{} ({})", queue.title(), bench.queue(queue).len());
        if claims.is_empty() {
            println!("  (empty)");
        }
        for claim in claims {
            let due = claim
                .due_at()
                .map_or_else(|| "unassigned".to_string(), |d| format!("due {}", format_relative(&d, &now)));
            println!(
                "  {} {:<15} {:<8} {}",
                claim.id.short(),
                claim.status.label(),
                claim.priority().map_or("-", |p| p.label()),
                due
            );
        }
    }
    Ok(())
}

async fn reports(client: &ApiClient, range: ReportRange, csv: bool) -> Result<()> {
    let sla = client.sla_report(&range).await?;
    let stats = client.dashboard_stats().await?;

    if csv {
        print!("{}", export_csv(&sla, Some(&stats)));
        return Ok(());
    }
    for card in stats.cards() {
        println!("{:<16} {}", card.title, card.value);
    }
    println!();
    println!("SLA");
    println!("  Total claims:     {}", sla.total_claims);
    println!("  On time:          {}", sla.on_time_label());
    println!("  Overdue:          {}", sla.overdue);
    println!("  Avg. cycle days:  {:.1}", sla.average_cycle_time);
    for (product, breaches) in sla.breaches_ranked() {
        println!("  {:<18}{} breaches", product, breaches);
    }
    Ok(())
}

fn print_user(user: &User) {
    println!("{:<24} {:<32} {}", user.display_name, user.email, user.role.badge());
}

async fn users(client: &ApiClient, action: UserCommand) -> Result<()> {
    match action {
        UserCommand::List { role, search } => {
            let directory = UserDirectory::new(client.list_users(role).await?);
            let matching = directory.filter(search.as_deref().unwrap_or_default(), role);
            for user in &matching {
                print_user(user);
            }
            println!("{} of {} users", matching.len(), directory.len());
        }
        UserCommand::Add { email, name, role } => {
            let user = client
                .create_user(&NewUser {
                    email,
                    role,
                    display_name: name,
                })
                .await?;
            println!("✓ User created");
            print_user(&user);
        }
        UserCommand::Edit {
            user_id,
            email,
            name,
            role,
        } => {
            let update = UserUpdate {
                email,
                role,
                display_name: name,
            };
            if update == UserUpdate::default() {
                bail!("Nothing to change. Pass --email, --name or --role.");
            }
            let user = client.update_user(user_id, &update).await?;
            println!("✓ User updated");
            print_user(&user);
        }
        UserCommand::Rm { user_id } => {
            client.delete_user(user_id).await?;
            println!("✓ User deleted");
        }
    }
    Ok(())
}

async fn nav(client: &ApiClient) -> Result<()> {
    let role = client.session().auth_state().await.role();
    for item in navigation_for(role) {
        println!("{:<12} {}", item.name, item.href);
    }
    if let Some(role) = role {
        let actions: Vec<&str> = quick_actions_for(role).iter().map(|a| a.label()).collect();
        println!();
        println!("Quick actions: {}", actions.join(", "));
    }
    Ok(())
}
