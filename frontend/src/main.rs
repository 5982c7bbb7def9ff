//! Command-line front end for the event portal.
//!
//! Each subcommand fills an in-memory page from its arguments, runs one
//! portal action against the configured backend, and renders notices and
//! confirmation prompts on the terminal.

use std::ffi::OsString;
use std::io::{self, BufReader, Stdin, Stdout};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use frontend::config::PortalSettings;
use frontend::domain::binding::{
    AttendanceForm, CompanionForm, EventEditForm, EventImageForm, FormKind, FormView,
    OrganizerEditForm, ProfileForm, SettingsForm, SignupForm, StaffAssignmentForm,
    StaffCreationForm, StaffEditForm,
};
use frontend::domain::ports::Notifier;
use frontend::domain::validation::{
    IdNumberType, ProfileField, ValidationResult, validate_id_number, validate_untyped_id_number,
};
use frontend::domain::{ActionOutcome, Attendee, Notice, PortalActions, PortalPorts, Reaction};
use frontend::outbound::http::HttpCommandRunner;
use frontend::ui::{HeadlessView, TerminalDialogs, load_upload};

type Dialogs = TerminalDialogs<BufReader<Stdin>, Stdout>;

#[derive(Debug, Parser)]
#[command(
    name = "event-portal",
    about = "Validate and submit event portal forms against the REST backend",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Args)]
struct AccountArgs {
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    password: String,
}

impl AccountArgs {
    fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("password", &self.password),
        ]
    }
}

#[derive(Debug, Clone, Args)]
struct PersonArgs {
    #[arg(long, default_value = "")]
    id_number: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    gender: String,
    /// Date of birth as `YYYY-MM-DD`.
    #[arg(long, default_value = "")]
    date_of_birth: String,
    /// Face photo to upload.
    #[arg(long)]
    image: Option<PathBuf>,
}

impl PersonArgs {
    fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("id_number", &self.id_number),
            ("phone", &self.phone),
            ("gender", &self.gender),
            ("date_of_birth", &self.date_of_birth),
        ]
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReactionArg {
    Like,
    Dislike,
}

impl From<ReactionArg> for Reaction {
    fn from(value: ReactionArg) -> Self {
        match value {
            ReactionArg::Like => Self::Like,
            ReactionArg::Dislike => Self::Dislike,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a new assistant.
    Signup {
        #[command(flatten)]
        account: AccountArgs,
        #[command(flatten)]
        person: PersonArgs,
        /// `cedula` or `passport`.
        #[arg(long, default_value = "cedula")]
        id_number_type: String,
        #[arg(long, default_value = "")]
        confirm_password: String,
        #[arg(long)]
        accept_terms: bool,
    },
    /// Create a staff account.
    CreateStaff {
        #[command(flatten)]
        account: AccountArgs,
        #[arg(long, default_value = "")]
        confirm_password: String,
    },
    /// Edit a staff account.
    EditStaff {
        #[command(flatten)]
        account: AccountArgs,
    },
    /// Edit an organizer account.
    EditOrganizer {
        #[command(flatten)]
        account: AccountArgs,
    },
    /// Delete a staff account.
    DeleteStaff { id: u64 },
    /// Delete an organizer account.
    DeleteOrganizer { id: u64 },
    /// Delete an event.
    DeleteEvent { id: u64 },
    /// Delete one date of an event.
    DeleteEventDate { id: u64 },
    /// Edit event details.
    EditEvent {
        id: u64,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        maps_link: String,
        #[arg(long, default_value = "")]
        capacity: String,
        #[arg(long, default_value = "")]
        capacity_type: String,
    },
    /// Replace the event cover image.
    EditEventImage {
        id: u64,
        #[arg(long)]
        image: PathBuf,
    },
    /// Change the face-recognition settings.
    ChangeSettings {
        #[arg(long, default_value = "")]
        model: String,
        #[arg(long, default_value = "")]
        threshold: String,
    },
    /// React to an event.
    React {
        user_id: u64,
        event_id: u64,
        #[arg(value_enum)]
        reaction: ReactionArg,
    },
    /// Register a companion for an event.
    AddCompanion {
        event_id: u64,
        #[arg(long, default_value = "")]
        id_number: String,
    },
    /// Assign a staff member to an event.
    AddStaff {
        event_id: u64,
        #[arg(long, default_value = "")]
        staff_id: String,
    },
    /// Record attendance for one event date.
    RecordAttendance {
        event_id: u64,
        date_id: u64,
        #[arg(long, conflicts_with = "id_number", required_unless_present = "id_number")]
        assistant_id: Option<u64>,
        #[arg(long)]
        id_number: Option<String>,
    },
    /// Update the signed-in assistant's profile.
    UpdateProfile {
        #[command(flatten)]
        account: AccountArgs,
        #[command(flatten)]
        person: PersonArgs,
    },
    /// Delete the signed-in assistant's profile.
    DeleteProfile,
    /// Check one profile field the way the editor does on blur.
    CheckProfileField {
        #[arg(value_parser = parse_profile_field)]
        field: ProfileField,
        value: String,
    },
    /// Validate an identification number.
    CheckId {
        value: String,
        /// `cedula` or `passport`; inferred from the value when omitted.
        #[arg(long)]
        kind: Option<String>,
    },
}

fn parse_profile_field(raw: &str) -> Result<ProfileField, String> {
    ProfileField::from_id(raw).ok_or_else(|| format!("unknown profile field `{raw}`"))
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build portal runtime")?;
    let outcome = runtime.block_on(async_main(cli))?;
    info!(?outcome, "action finished");
    Ok(if outcome == ActionOutcome::Completed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn async_main(cli: Cli) -> Result<ActionOutcome> {
    let settings = PortalSettings::load_from_iter([OsString::from("event-portal")])
        .map_err(|error| eyre!("failed to load portal settings: {error}"))?;
    let dialogs = Arc::new(TerminalDialogs::new(
        settings.feedback_style()?,
        BufReader::new(io::stdin()),
        io::stdout(),
    ));

    if let Command::CheckId { value, kind } = &cli.command {
        let policy = settings.passport_policy()?;
        let result = match kind {
            Some(kind) => kind
                .parse::<IdNumberType>()
                .and_then(|id_type| validate_id_number(id_type, value, policy)),
            None => validate_untyped_id_number(value, policy),
        };
        return Ok(report_check(dialogs.as_ref(), result));
    }

    let view = Arc::new(page_for(&cli.command)?);
    let runner = HttpCommandRunner::new(
        settings.api_url()?,
        settings.request_timeout()?,
        Arc::new(settings.session()),
    )
    .wrap_err("failed to build HTTP client")?;
    let actions = PortalActions::new(PortalPorts {
        runner: Arc::new(runner),
        confirmation: dialogs.clone(),
        notifier: dialogs.clone(),
        surface: view.clone(),
        clock: Arc::new(DefaultClock),
    })
    .with_rules(settings.validation_rules()?)
    .with_organizer_delete_route(settings.organizer_delete_route()?);

    let outcome = dispatch(&actions, &cli.command, dialogs.as_ref()).await?;
    for navigation in view.navigation() {
        info!(?navigation, "page navigation requested");
    }
    Ok(outcome)
}

fn report_check(dialogs: &Dialogs, result: ValidationResult) -> ActionOutcome {
    match result {
        Ok(()) => {
            dialogs.show(&Notice::success("Válido", "El valor es válido."));
            ActionOutcome::Completed
        }
        Err(error) => {
            dialogs.show(&Notice::warning(error.title(), error.to_string()));
            ActionOutcome::Invalid(error)
        }
    }
}

fn page<K: FormKind>(fields: &[(&str, &str)], image: Option<&PathBuf>) -> Result<HeadlessView> {
    let mut builder = HeadlessView::builder().form::<K>();
    for (id, value) in fields {
        builder = builder.field(*id, *value);
    }
    if let Some(path) = image {
        builder = builder.file("image", load_upload(path)?);
    }
    Ok(builder.build())
}

fn page_for(command: &Command) -> Result<HeadlessView> {
    let view = match command {
        Command::Signup {
            account,
            person,
            id_number_type,
            confirm_password,
            accept_terms,
        } => {
            let mut fields = vec![
                ("id_number_type", id_number_type.as_str()),
                ("confirm_password", confirm_password.as_str()),
                ("accepted_terms", if *accept_terms { "on" } else { "" }),
            ];
            fields.extend(account.pairs());
            fields.extend(person.pairs());
            page::<SignupForm>(&fields, person.image.as_ref())?
        }
        Command::CreateStaff {
            account,
            confirm_password,
        } => {
            let mut fields = vec![("confirm_password", confirm_password.as_str())];
            fields.extend(account.pairs());
            page::<StaffCreationForm>(&fields, None)?
        }
        Command::EditStaff { account } => page::<StaffEditForm>(&account.pairs(), None)?,
        Command::EditOrganizer { account } => page::<OrganizerEditForm>(&account.pairs(), None)?,
        Command::DeleteStaff { id } => HeadlessView::builder().row(format!("staff-{id}")).build(),
        Command::DeleteOrganizer { id } => HeadlessView::builder()
            .row(format!("organizer-{id}"))
            .build(),
        Command::DeleteEvent { id } => HeadlessView::builder().row(format!("event-{id}")).build(),
        Command::DeleteEventDate { id } => HeadlessView::builder().row(format!("date-{id}")).build(),
        Command::EditEvent {
            name,
            description,
            location,
            maps_link,
            capacity,
            capacity_type,
            ..
        } => page::<EventEditForm>(
            &[
                ("name", name.as_str()),
                ("description", description.as_str()),
                ("location", location.as_str()),
                ("maps_link", maps_link.as_str()),
                ("capacity", capacity.as_str()),
                ("capacity_type", capacity_type.as_str()),
            ],
            None,
        )?,
        Command::EditEventImage { image, .. } => page::<EventImageForm>(&[], Some(image))?,
        Command::ChangeSettings { model, threshold } => {
            page::<SettingsForm>(&[("model", model.as_str()), ("threshold", threshold.as_str())], None)?
        }
        Command::AddCompanion { id_number, .. } => {
            page::<CompanionForm>(&[("companion_id_number", id_number.as_str())], None)?
        }
        Command::AddStaff { staff_id, .. } => {
            page::<StaffAssignmentForm>(&[("staff_id", staff_id.as_str())], None)?
        }
        Command::RecordAttendance { id_number, .. } => page::<AttendanceForm>(
            &[("id_number", id_number.as_deref().unwrap_or_default())],
            None,
        )?,
        Command::UpdateProfile { account, person } => {
            let mut fields = account.pairs().to_vec();
            fields.extend(person.pairs());
            page::<ProfileForm>(&fields, person.image.as_ref())?
        }
        Command::CheckProfileField { field, value } => HeadlessView::builder()
            .field(field.id(), value.as_str())
            .build(),
        Command::React { .. } | Command::DeleteProfile | Command::CheckId { .. } => {
            HeadlessView::default()
        }
    };
    Ok(view)
}

async fn dispatch(
    actions: &PortalActions,
    command: &Command,
    dialogs: &Dialogs,
) -> Result<ActionOutcome> {
    let surface = actions.surface();
    let outcome = match command {
        Command::Signup { .. } => actions.signup(&FormView::bind(surface)?).await,
        Command::CreateStaff { .. } => actions.create_staff(&FormView::bind(surface)?),
        Command::EditStaff { .. } => actions.edit_staff(&FormView::bind(surface)?),
        Command::EditOrganizer { .. } => actions.edit_organizer(&FormView::bind(surface)?),
        Command::DeleteStaff { id } => actions.delete_staff(*id).await,
        Command::DeleteOrganizer { id } => actions.delete_organizer(*id).await,
        Command::DeleteEvent { id } => actions.delete_event(*id).await,
        Command::DeleteEventDate { id } => actions.delete_event_date(*id).await,
        Command::EditEvent { id, .. } => actions.edit_event(&FormView::bind(surface)?, *id).await,
        Command::EditEventImage { id, .. } => {
            actions.edit_event_image(&FormView::bind(surface)?, *id).await
        }
        Command::ChangeSettings { .. } => actions.change_settings(&FormView::bind(surface)?).await,
        Command::React {
            user_id,
            event_id,
            reaction,
        } => {
            actions
                .react_to_event(*user_id, *event_id, (*reaction).into())
                .await
        }
        Command::AddCompanion { event_id, .. } => {
            actions
                .add_companion(&FormView::bind(surface)?, *event_id)
                .await
        }
        Command::AddStaff { event_id, .. } => {
            actions
                .add_staff_to_event(&FormView::bind(surface)?, *event_id)
                .await
        }
        Command::RecordAttendance {
            event_id,
            date_id,
            assistant_id,
            ..
        } => {
            let attendee = match assistant_id {
                Some(id) => Attendee::Known(*id),
                None => Attendee::ByIdNumber(FormView::<AttendanceForm>::bind(surface)?),
            };
            actions.record_attendance(*event_id, *date_id, attendee).await
        }
        Command::UpdateProfile { .. } => actions.update_profile(&FormView::bind(surface)?).await,
        Command::DeleteProfile => actions.delete_profile().await,
        Command::CheckProfileField { field, .. } => {
            report_check(dialogs, actions.check_profile_field(*field))
        }
        Command::CheckId { .. } => return Err(eyre!("check-id runs without a backend")),
    };
    Ok(outcome)
}
