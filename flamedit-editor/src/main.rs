use clap::{Parser, Subcommand, ValueEnum};
use flamedit_core::editor::MenuTarget;
use flamedit_core::file_io;
use flamedit_core::genome::Genome;
use flamedit_core::hit_test::SceneItem;
use flamedit_core::selection::HandleKey;
use kurbo::Point;
use std::path::{Path, PathBuf};

mod config;
use config::SettingsStore;

mod script;

mod session;
use session::Session;

/// Flamedit - Triangle editor for fractal flame transforms
#[derive(Parser, Debug)]
#[command(name = "Flamedit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Xform file to edit (created if missing)
    file: PathBuf,

    /// Write the result here instead of back to FILE
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every transform
    Show,
    /// Append default transforms
    Add {
        #[arg(default_value_t = 1)]
        count: usize,
    },
    /// Delete a transform
    Remove { index: usize },
    /// Rotate a transform about the pivot
    Rotate {
        index: usize,
        degrees: f64,
        /// Edit the post transform
        #[arg(long)]
        post: bool,
    },
    /// Scale a transform about the pivot
    Scale {
        index: usize,
        factor: f64,
        #[arg(long)]
        post: bool,
    },
    /// Mirror a transform about the pivot
    Flip {
        index: usize,
        #[arg(value_enum)]
        axis: Axis,
        #[arg(long)]
        post: bool,
    },
    /// Copy a transform and paste it before the final one
    Duplicate { index: usize },
    /// Reset a transform to identity
    ResetPosition {
        index: usize,
        #[arg(long)]
        post: bool,
    },
    /// Add or remove the final transform
    Final {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Replay a JSON gesture script
    Replay { script: PathBuf },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Toggle {
    On,
    Off,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = SettingsStore::load(args.settings.clone());
    let genome = load_or_new(&args.file)?;

    let mut session = Session::new(genome, store.settings());

    if let Command::Show = args.command {
        print_genome(&session);
        return Ok(());
    }

    apply_command(&mut session, &args.command)?;
    if !session.is_modified() {
        log::info!("No transforms were modified");
    }
    log::debug!("{} undo checkpoints recorded", session.history().undo_len());

    let (genome, settings) = session.into_parts();
    let output = args.output.as_ref().unwrap_or(&args.file);
    file_io::save_genome(output, &genome)?;

    store.set_settings(settings);
    store.save();
    Ok(())
}

fn load_or_new(path: &Path) -> Result<Genome, Box<dyn std::error::Error>> {
    if path.exists() {
        Ok(file_io::load_genome(path)?)
    } else {
        log::info!("{} does not exist, starting a new genome", path.display());
        Ok(Genome::new())
    }
}

fn print_genome(session: &Session) {
    let editor = session.editor();
    for (i, xform) in editor.genome().xforms().iter().enumerate() {
        if let Some(label) = editor.info_label(i) {
            print!("{}", label);
        }
        println!("  coefs: {:?}", xform.coefs);
        println!("  post:  {:?}", xform.post);
    }
}

/// Select `index` and return the key to edit, switching to the post triangle if asked
fn target(session: &mut Session, index: usize, post: bool) -> Result<HandleKey, Box<dyn std::error::Error>> {
    let count = session.editor().num_triangles();
    if index >= count {
        return Err(format!("no transform {} ({} transforms)", index, count).into());
    }
    session.edit(|ed| {
        ed.select_triangle(index);
        ed.edit_post_triangle(post);
    });
    Ok(if post {
        HandleKey::Post
    } else {
        HandleKey::Xform(index)
    })
}

fn apply_command(session: &mut Session, command: &Command) -> Result<(), Box<dyn std::error::Error>> {
    match *command {
        Command::Show => {}
        Command::Add { count } => {
            for _ in 0..count {
                session.edit(|ed| ed.add_triangle());
            }
        }
        Command::Remove { index } => {
            target(session, index, false)?;
            session.edit(|ed| ed.remove_triangle(None));
        }
        Command::Rotate { index, degrees, post } => {
            let key = target(session, index, post)?;
            session.edit(|ed| {
                let pivot = ed.triangle_transform_pos();
                ed.rotate_triangle(key, degrees.to_radians(), pivot);
            });
            session.save_undo();
        }
        Command::Scale { index, factor, post } => {
            if factor == 0.0 {
                return Err("scale factor must be non-zero".into());
            }
            let key = target(session, index, post)?;
            session.edit(|ed| {
                let pivot = ed.triangle_transform_pos();
                ed.scale_triangle(key, factor, factor, pivot);
            });
            session.save_undo();
        }
        Command::Flip { index, axis, post } => {
            target(session, index, post)?;
            session.edit(|ed| match axis {
                Axis::Horizontal => ed.flip_horizontal(None),
                Axis::Vertical => ed.flip_vertical(None),
            });
        }
        Command::Duplicate { index } => {
            target(session, index, false)?;
            session.edit(|ed| {
                ed.copy(None);
                ed.paste();
            });
        }
        Command::ResetPosition { index, post } => {
            let key = target(session, index, post)?;
            let menu_target = MenuTarget {
                pos: Point::ORIGIN,
                item: Some(SceneItem::from_handle(key)),
            };
            session.edit(|ed| ed.reset_triangle_position(Some(&menu_target)));
        }
        Command::Final { state } => {
            session.edit(|ed| ed.enable_final_xform(matches!(state, Toggle::On)));
        }
        Command::Replay { ref script } => {
            let gestures = script::load_script(script)?;
            session.replay(&gestures);
        }
    }
    Ok(())
}
