use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use broadcaster::{Broadcaster, Draft, MedicalContext, SmsLinkChannel};
use clap::{Args, Parser, Subcommand, ValueEnum};
use coordinator::{
    Coordinator, CoordinatorConfig, CoordinatorEvent, CoordinatorHandle, CoordinatorParts,
    CoordinatorState,
};
use database::{Database, ProfileField, Stores};
use raksha_core::{
    EmergencyContact, FixedLocation, Location, LocationProvider, MessageTemplate, Persistence,
    SilentCue, UserProfile,
};
use recorder::{FileCaptureDevice, RecorderConfig, RecordingController};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use vitals::{HealthReport, VitalReadings};

mod config;

use config::AppConfig;

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Parser)]
#[command(name = "raksha")]
#[command(about = "Personal safety alerts: emergency contacts, SOS countdown, history")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage emergency contacts
    #[command(subcommand)]
    Contacts(ContactsCommand),
    /// Show or clear the alert history
    #[command(subcommand)]
    History(HistoryCommand),
    /// Show or edit the user profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Score a set of vital readings
    Vitals(VitalsArgs),
    /// Arm the SOS countdown (or fire immediately) and notify contacts
    Sos(SosArgs),
    /// Manage message templates
    #[command(subcommand)]
    Templates(TemplatesCommand),
    /// Send quick messages and review what was sent
    #[command(subcommand)]
    Messages(MessagesCommand),
}

#[derive(Debug, Subcommand)]
enum ContactsCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "")]
        relationship: String,
    },
    List,
    /// Remove the contact at the index shown by `contacts list`
    Remove { index: usize },
}

#[derive(Debug, Subcommand)]
enum HistoryCommand {
    List {
        /// Print raw JSON records
        #[arg(long)]
        json: bool,
    },
    Clear,
}

#[derive(Debug, Subcommand)]
enum ProfileCommand {
    Show,
    /// Set one field: name, age, gender or blood-type
    Set { field: String, value: String },
}

#[derive(Debug, Clone, Args)]
struct ReadingArgs {
    #[arg(long)]
    heart_rate: Option<f64>,
    #[arg(long)]
    temperature: Option<f64>,
    #[arg(long)]
    respiratory_rate: Option<f64>,
    #[arg(long)]
    systolic: Option<f64>,
    #[arg(long)]
    diastolic: Option<f64>,
    #[arg(long)]
    steps: Option<u32>,
}

impl ReadingArgs {
    fn any_supplied(&self) -> bool {
        self.heart_rate.is_some()
            || self.temperature.is_some()
            || self.respiratory_rate.is_some()
            || self.systolic.is_some()
            || self.diastolic.is_some()
            || self.steps.is_some()
    }

    /// Supplied readings, with resting defaults for the rest.
    fn readings(&self) -> VitalReadings {
        let defaults = VitalReadings::default();
        VitalReadings {
            heart_rate: self.heart_rate.unwrap_or(defaults.heart_rate),
            body_temperature: self.temperature.unwrap_or(defaults.body_temperature),
            respiratory_rate: self.respiratory_rate.unwrap_or(defaults.respiratory_rate),
            systolic: self.systolic.unwrap_or(defaults.systolic),
            diastolic: self.diastolic.unwrap_or(defaults.diastolic),
            step_count: self.steps.unwrap_or(defaults.step_count),
        }
    }
}

#[derive(Debug, Args)]
struct VitalsArgs {
    #[command(flatten)]
    readings: ReadingArgs,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Args)]
struct LocationArgs {
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,
}

impl LocationArgs {
    fn location(&self) -> Option<Location> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Location::new(lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Args)]
struct SosArgs {
    #[command(flatten)]
    location: LocationArgs,
    /// Skip the countdown
    #[arg(long)]
    immediate: bool,
    /// Cancel the countdown after N seconds
    #[arg(long, conflicts_with = "immediate")]
    cancel_after: Option<u64>,
    /// Append profile details to the alert; the health line needs readings
    #[arg(long)]
    medical: bool,
    #[command(flatten)]
    readings: ReadingArgs,
}

#[derive(Debug, Subcommand)]
enum TemplatesCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "💬")]
        icon: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        include_location: bool,
    },
    List,
    Remove { id: Uuid },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum QuickMessage {
    Sos,
    Safe,
    Location,
}

#[derive(Debug, Subcommand)]
enum MessagesCommand {
    /// Send a quick message, a template, or custom text to every contact
    Send {
        #[arg(value_enum, conflicts_with_all = ["template", "text"])]
        quick: Option<QuickMessage>,
        #[arg(long, conflicts_with = "text")]
        template: Option<Uuid>,
        #[arg(long)]
        text: Option<String>,
        #[command(flatten)]
        location: LocationArgs,
    },
    List,
    Clear,
}

#[tokio::main]
async fn main() -> CliResult {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    // Vitals never touches storage.
    if let Command::Vitals(args) = &cli.command {
        return vitals_command(args);
    }

    ensure_parent_dir(&config.database_url)?;
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    let persistence: Arc<dyn Persistence> = Arc::new(db.clone());
    let stores = Stores::open(persistence).await;

    let result = match cli.command {
        Command::Contacts(cmd) => contacts_command(&stores, cmd).await,
        Command::History(cmd) => history_command(&stores, cmd).await,
        Command::Profile(cmd) => profile_command(&stores, cmd).await,
        Command::Sos(args) => sos_command(&stores, &config, args).await,
        Command::Templates(cmd) => templates_command(&stores, cmd).await,
        Command::Messages(cmd) => messages_command(&stores, cmd).await,
        Command::Vitals(_) => Ok(()),
    };

    db.close().await;
    result
}

fn ensure_parent_dir(database_url: &str) -> CliResult {
    let Some(path) = database_url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.starts_with(':') {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

async fn contacts_command(stores: &Stores, cmd: ContactsCommand) -> CliResult {
    match cmd {
        ContactsCommand::Add {
            name,
            phone,
            relationship,
        } => {
            let contact = EmergencyContact::new(name, phone, relationship)?;
            println!("Added {} ({})", contact.name, contact.phone_number);
            stores.contacts.add(contact).await?;
        }
        ContactsCommand::List => {
            let contacts = stores.contacts.list().await;
            if contacts.is_empty() {
                println!("No emergency contacts. Add one with `raksha contacts add`.");
            }
            for (i, contact) in contacts.iter().enumerate() {
                println!(
                    "[{}] {} <{}> {}",
                    i, contact.name, contact.phone_number, contact.relationship
                );
            }
        }
        ContactsCommand::Remove { index } => match stores.contacts.remove_at(index).await {
            Some(contact) => println!("Removed {}", contact.name),
            None => println!("No contact at index {}", index),
        },
    }
    Ok(())
}

async fn history_command(stores: &Stores, cmd: HistoryCommand) -> CliResult {
    match cmd {
        HistoryCommand::List { json } => {
            let events = stores.history.list().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
                return Ok(());
            }
            if events.is_empty() {
                println!("No alerts yet.");
            }
            for event in &events {
                println!(
                    "{}  {}  contacts notified: {}",
                    event.timestamp.to_rfc3339(),
                    event.coordinates_text(),
                    event.contacts_notified
                );
                if let Some(url) = event.map_url() {
                    println!("    {}", url);
                }
            }
        }
        HistoryCommand::Clear => {
            stores.history.clear().await;
            println!("History cleared");
        }
    }
    Ok(())
}

async fn profile_command(stores: &Stores, cmd: ProfileCommand) -> CliResult {
    match cmd {
        ProfileCommand::Show => {}
        ProfileCommand::Set { field, value } => {
            let field = ProfileField::parse(&field)
                .ok_or_else(|| format!("Unknown profile field: {}", field))?;
            stores.profile.set_field(field, &value).await?;
            println!("Updated {}", field.display_name());
        }
    }

    let profile = stores.profile.get().await;
    println!("Name:       {}", profile.name);
    println!("Age:        {}", profile.age);
    println!("Gender:     {}", profile.gender);
    println!("Blood type: {}", profile.blood_type);
    Ok(())
}

/// Medical block for outgoing alerts. No health line unless readings were given.
fn medical_context(profile: &UserProfile, readings: &ReadingArgs) -> MedicalContext {
    let report = readings
        .any_supplied()
        .then(|| HealthReport::from_readings(readings.readings()));
    MedicalContext::new(profile, report.as_ref())
}

fn vitals_command(args: &VitalsArgs) -> CliResult {
    let readings = args.readings.readings();
    let report = HealthReport::from_readings(readings);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.summary());
    println!(
        "Heart rate:       {} ({})",
        readings.heart_rate_text(),
        report.heart_rate
    );
    println!("Temperature:      {}", readings.body_temperature_text());
    println!("Respiratory rate: {}", readings.respiratory_rate_text());
    println!(
        "Blood pressure:   {} ({})",
        readings.blood_pressure_text(),
        report.blood_pressure
    );
    Ok(())
}

async fn sos_command(stores: &Stores, config: &AppConfig, args: SosArgs) -> CliResult {
    let (channel, mut outbox) = SmsLinkChannel::new();
    tokio::spawn(async move {
        while let Some(link) = outbox.recv().await {
            println!("Open to send: {}", link);
        }
    });

    let recorder = Arc::new(RecordingController::new(
        Arc::new(FileCaptureDevice),
        RecorderConfig::new(&config.recordings_dir),
    ));
    let parts = CoordinatorParts {
        contacts: stores.contacts.clone(),
        history: stores.history.clone(),
        broadcaster: Broadcaster::new(Arc::new(channel)),
        recorder: recorder.clone(),
        cue: Arc::new(SilentCue),
    };
    let coordinator_config = CoordinatorConfig {
        shake_to_sos_enabled: config.shake_to_sos,
        ..CoordinatorConfig::default()
    };
    let handle = Coordinator::new(parts, coordinator_config).spawn();

    if args.medical {
        let profile = stores.profile.get().await;
        handle
            .set_medical_context(Some(medical_context(&profile, &args.readings)))
            .await?;
    }

    if stores.contacts.is_empty().await {
        warn!("No emergency contacts configured; the alert will only be logged");
    }

    let mut events = handle.events();
    let location = FixedLocation(args.location.location()).current_location();
    let started = if args.immediate {
        handle.fire(location).await?
    } else {
        handle.arm(location).await?
    };
    if !started {
        return Err("coordinator was not idle".into());
    }

    let fired = watch_alert(&handle, &mut events, args.cancel_after).await?;

    if fired {
        if let Some(path) = recorder.current_file() {
            info!(path = %path.display(), "Recording evidence");
        }
        handle.stop_recording().await?;
        println!("{}", handle.snapshot().dispatch_status);
        if let Some(event) = stores.history.latest().await {
            println!(
                "Alert logged at {} ({})",
                event.timestamp.to_rfc3339(),
                event.coordinates_text()
            );
        }
    }

    handle.shutdown().await?;
    Ok(())
}

/// Follow the countdown until the alert fires and cools down, or is cancelled.
///
/// Returns whether the alert fired.
async fn watch_alert(
    handle: &CoordinatorHandle,
    events: &mut tokio::sync::broadcast::Receiver<CoordinatorEvent>,
    cancel_after: Option<u64>,
) -> CliResult<bool> {
    let cancel_timer = async {
        match cancel_after {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(cancel_timer);

    let mut fired = false;
    loop {
        tokio::select! {
            event = events.recv() => match event? {
                CoordinatorEvent::StateChanged(CoordinatorState::CountingDown { remaining }) => {
                    println!("SOS in {}s (Ctrl-C to cancel)", remaining);
                }
                CoordinatorEvent::StateChanged(CoordinatorState::Idle) => return Ok(fired),
                CoordinatorEvent::StateChanged(_) => {}
                CoordinatorEvent::Fired { dispatched, failed, .. } => {
                    fired = true;
                    println!("Alert fired: {} dispatched, {} failed", dispatched, failed);
                }
            },
            _ = &mut cancel_timer, if !fired => {
                if handle.cancel().await? {
                    println!("Countdown cancelled");
                    return Ok(false);
                }
            }
            signal = tokio::signal::ctrl_c(), if !fired => {
                signal?;
                if handle.cancel().await? {
                    println!("Countdown cancelled");
                    return Ok(false);
                }
            }
        }
    }
}

async fn templates_command(stores: &Stores, cmd: TemplatesCommand) -> CliResult {
    match cmd {
        TemplatesCommand::Add {
            name,
            icon,
            body,
            include_location,
        } => {
            let template = MessageTemplate::new(name, icon, body, include_location)?;
            println!("Added template {} ({})", template.name, template.id);
            stores.templates.add(template).await?;
        }
        TemplatesCommand::List => {
            let templates = stores.templates.list().await;
            if templates.is_empty() {
                println!("No templates.");
            }
            for template in &templates {
                let marker = if template.include_location { " 📍" } else { "" };
                println!("{} {} {}{}", template.id, template.icon, template.name, marker);
                println!("    {}", template.body);
            }
        }
        TemplatesCommand::Remove { id } => {
            let removed = stores.templates.remove(id).await?;
            println!("Removed template {}", removed.name);
        }
    }
    Ok(())
}

async fn messages_command(stores: &Stores, cmd: MessagesCommand) -> CliResult {
    match cmd {
        MessagesCommand::Send {
            quick,
            template,
            text,
            location,
        } => {
            let location = location.location();
            let draft = match (quick, template, text) {
                (Some(QuickMessage::Sos), _, _) => Draft::sos(),
                (Some(QuickMessage::Safe), _, _) => Draft::safe(),
                (Some(QuickMessage::Location), _, _) => Draft::location(location.as_ref()),
                (None, Some(id), _) => {
                    let template = stores
                        .templates
                        .get(id)
                        .await
                        .ok_or_else(|| format!("No template with id {}", id))?;
                    Draft::from_template(&template, location.as_ref())
                }
                (None, None, Some(text)) => Draft::custom(text),
                (None, None, None) => return Err("Nothing to send".into()),
            };

            let contacts = stores.contacts.list().await;
            if contacts.is_empty() {
                return Err("No emergency contacts configured".into());
            }

            let (channel, mut outbox) = SmsLinkChannel::new();
            let broadcaster = Broadcaster::new(Arc::new(channel));
            let report = broadcaster.fan_out(&contacts, &draft.body).await;
            drop(broadcaster);
            while let Some(link) = outbox.recv().await {
                println!("Open to send: {}", link);
            }

            stores
                .messages
                .record(draft.history_entry(contacts.len()))
                .await;
            println!(
                "{} {} sent to {} contact(s)",
                draft.kind.icon(),
                draft.kind.label(),
                report.dispatched()
            );
        }
        MessagesCommand::List => {
            let entries = stores.messages.list().await;
            if entries.is_empty() {
                println!("No messages sent yet.");
            }
            for entry in &entries {
                println!(
                    "{}  {} {}  to {}: {}",
                    entry.timestamp.to_rfc3339(),
                    entry.kind.icon(),
                    entry.kind.label(),
                    entry.recipient_count,
                    entry.preview
                );
            }
        }
        MessagesCommand::Clear => {
            stores.messages.clear().await;
            println!("Message history cleared");
        }
    }
    Ok(())
}
