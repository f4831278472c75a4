use clap::{Parser, Subcommand};
use rust_i18n::t;
use skelanim::app::views::HierarchyView;
use skelanim::app::{AppCommand, CommandHandler, EditorSession};
use skelanim::core::animation::bone::Bone;
use skelanim::core::animation::skeleton::Skeleton;
use skelanim::core::project::ActiveElement;
use skelanim::core::settings::ProjectSettings;
use skelanim::history::{HistoryConfig, RedoPolicy};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

rust_i18n::i18n!("locales", fallback = "en");

/// Headless front end for skeletal-animation projects
#[derive(Parser)]
#[command(name = "skelanim")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Discard undone edits when a new edit is made
    #[arg(long, global = true)]
    truncate_redo: bool,

    /// Keep at most this many undo steps
    #[arg(long, global = true)]
    max_steps: Option<usize>,

    /// Message language (en, zh-CN)
    #[arg(long, global = true, default_value = "en")]
    lang: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a project directory and print its outline
    Info {
        dir: PathBuf,
    },

    /// Load a project and write it back out
    Resave {
        dir: PathBuf,

        /// Write to another directory instead of in place
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Add a skeleton with a single bone and save the project
    NewSkeleton {
        dir: PathBuf,
        name: String,

        /// Circle bone with this radius
        #[arg(long, conflicts_with = "segment", required_unless_present = "segment")]
        circle: Option<f64>,

        /// Segment bone as LENGTH,ROTATION
        #[arg(long, value_parser = parse_pair)]
        segment: Option<(f64, f64)>,

        /// Bone position as X,Y
        #[arg(long, value_parser = parse_pair, default_value = "0,0")]
        position: (f64, f64),
    },
}

fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let (a, b) = s.split_once(',').ok_or_else(|| format!("expected two comma-separated numbers, got '{s}'"))?;
    let parse = |v: &str| v.trim().parse::<f64>().map_err(|e| format!("'{v}': {e}"));
    Ok((parse(a)?, parse(b)?))
}

fn open_session(cli: &Cli, dir: &Path, must_exist: bool) -> Result<(EditorSession, Rc<RefCell<HierarchyView>>), Box<dyn std::error::Error>> {
    let config = HistoryConfig {
        max_steps: cli.max_steps,
        redo_policy: if cli.truncate_redo { RedoPolicy::Truncate } else { RedoPolicy::Keep },
    };
    let mut session = EditorSession::new(ProjectSettings::default(), config);
    let tree = Rc::new(RefCell::new(HierarchyView::new()));
    session.register_view(tree.clone());
    if must_exist || dir.is_dir() {
        CommandHandler::execute(&mut session, AppCommand::LoadProject(dir.to_path_buf()))?;
    } else {
        info!(dir = %dir.display(), "Starting a new project");
    }
    Ok((session, tree))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    rust_i18n::set_locale(&cli.lang);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match &cli.command {
        Commands::Info { dir } => {
            let (_session, tree) = open_session(&cli, dir, true)?;
            println!("{}", tree.borrow().render());
        }
        Commands::Resave { dir, out } => {
            let (mut session, _) = open_session(&cli, dir, true)?;
            let target = out.clone().unwrap_or_else(|| dir.clone());
            CommandHandler::execute(&mut session, AppCommand::SaveProject(target.clone()))?;
            let project = session.project();
            println!("{}", t!(
                "cli.saved",
                skeletons = project.number_of_skeletons(),
                animations = project.number_of_animations(),
                dir = target.display()
            ));
        }
        Commands::NewSkeleton { dir, name, circle, segment, position } => {
            let (mut session, tree) = open_session(&cli, dir, false)?;
            let position = [position.0, position.1];
            let bone = match (circle, segment) {
                (Some(radius), _) => Bone::circle(*radius, position),
                (None, Some((length, rotation))) => Bone::segment(*length, *rotation, position),
                (None, None) => return Err("either --circle or --segment is required".into()),
            };
            let index = session.project().number_of_skeletons();
            for cmd in [
                AppCommand::AddSkeleton(Skeleton::named(name.clone())),
                AppCommand::Select(ActiveElement::Skeleton(index)),
                AppCommand::AddBone(bone),
                AppCommand::SaveProject(dir.clone()),
            ] {
                CommandHandler::execute(&mut session, cmd)?;
            }
            println!("{}", tree.borrow().render());
        }
    }
    Ok(())
}
