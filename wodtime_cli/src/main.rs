use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use wodtime_core::*;

#[derive(Parser)]
#[command(name = "wodtime")]
#[command(about = "Workout duration calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate exercise and workout durations in a library
    Calc {
        /// Path to the library JSON file
        library: PathBuf,

        /// Only show this workout
        #[arg(long)]
        workout: Option<String>,

        /// Show equipment setup, removal and adjustment per exercise
        #[arg(long)]
        explain: bool,

        /// Write computed durations back into the library file
        #[arg(long)]
        write: bool,
    },

    /// Validate a library
    Check {
        /// Path to the library JSON file
        library: PathBuf,
    },

    /// Calculate the duration of a single exercise
    Exercise {
        /// Path to the library JSON file
        library: PathBuf,

        /// Exercise id
        exercise_id: String,

        /// Quantity per set (reps, seconds, ...)
        #[arg(long, default_value_t = 1)]
        quantity: u32,

        /// Number of sets
        #[arg(long, default_value_t = 1)]
        sets: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        wodtime_core::logging::init_with_level("debug");
    } else {
        wodtime_core::logging::init_with_level("warn");
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Calc {
            library,
            workout,
            explain,
            write,
        } => cmd_calc(&library, workout.as_deref(), explain, write, &config),
        Commands::Check { library } => cmd_check(&library),
        Commands::Exercise {
            library,
            exercise_id,
            quantity,
            sets,
        } => cmd_exercise(&library, &exercise_id, quantity, sets, &config),
    }
}

fn cmd_calc(
    path: &Path,
    workout_id: Option<&str>,
    explain: bool,
    write: bool,
    config: &Config,
) -> Result<()> {
    // Held until the durations are saved
    let _lock = if write { Some(Library::lock(path)?) } else { None };

    let mut library = Library::load(path)?;
    ensure_valid(&library)?;

    if let Some(id) = workout_id {
        if library.find_workout(id).is_none() {
            return Err(Error::Library(format!("Unknown workout '{}'", id)));
        }
    }

    let settings = library.settings.merged_over(&config.rest);
    tracing::debug!("Effective rest settings: {:?}", settings);
    let workouts = library.recalculate(&settings)?;

    for workout in workouts
        .iter()
        .filter(|w| workout_id.map_or(true, |id| w.id == id))
    {
        display_workout(workout, explain);
    }

    if write {
        library.save(path)?;
        println!("✓ Saved durations to {}", path.display());
    }

    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let library = Library::load(path)?;
    ensure_valid(&library)?;

    println!(
        "✓ Library is valid: {} equipment, {} exercises, {} workouts",
        library.equipment.len(),
        library.exercises.len(),
        library.workouts.len()
    );
    Ok(())
}

fn cmd_exercise(
    path: &Path,
    exercise_id: &str,
    quantity: u32,
    sets: u32,
    config: &Config,
) -> Result<()> {
    let library = Library::load(path)?;
    let exercise = library.resolve_exercise(exercise_id)?;
    let settings = library.settings.merged_over(&config.rest);

    let workout_exercise = WorkoutExercise {
        ordinal_number: 1,
        circuit: String::new(),
        primary_exercise: Some(exercise.clone()),
        secondary_exercise: None,
        quantity,
        sets,
        duration: 0.0,
    };
    let duration = compute_exercise_duration(&workout_exercise, Some(&exercise), &settings);

    println!(
        "{}: {} x {} → {:.2}s ({})",
        exercise.name,
        sets,
        quantity,
        duration,
        format_minutes(duration)
    );
    Ok(())
}

fn ensure_valid(library: &Library) -> Result<()> {
    let errors = library.validate();
    if !errors.is_empty() {
        eprintln!("Library validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Validation(errors));
    }
    Ok(())
}

fn display_workout(workout: &Workout, explain: bool) {
    let report = plan_transitions(&workout.exercises);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", workout.name);
    println!("╰─────────────────────────────────────────╯");
    println!();

    for (exercise, step) in ordered(&workout.exercises).into_iter().zip(&report.steps) {
        let name = exercise
            .primary_exercise
            .as_ref()
            .map_or("(no exercise)", |e| e.name.as_str());
        println!(
            "  #{:<3} [{}] {:<28} {:>9.2}s",
            exercise.ordinal_number, exercise.circuit, name, exercise.duration
        );

        if explain {
            for equipment in &step.setup {
                println!("         setup {} (+{:.2}s)", equipment.id, equipment.setup_duration);
            }
            for equipment in &step.removal {
                println!(
                    "         remove {} (+{:.2}s)",
                    equipment.id, equipment.removal_duration
                );
            }
            for equipment in &step.adjustment {
                println!(
                    "         adjust {} (+{:.2}s)",
                    equipment.id, equipment.adjustment_duration
                );
            }
        }
    }

    println!();
    println!("  Exercises: {:.2}s", report.base_duration);
    println!("  Equipment: {:.2}s", report.transition_duration());
    println!(
        "  Total:     {:.2}s ({})",
        workout.duration,
        format_minutes(workout.duration)
    );
}

fn ordered(exercises: &[WorkoutExercise]) -> Vec<&WorkoutExercise> {
    let mut ordered: Vec<_> = exercises.iter().collect();
    ordered.sort_by_key(|e| e.ordinal_number);
    ordered
}

fn format_minutes(seconds: f64) -> String {
    let whole = seconds.round() as u64;
    format!("{}m {}s", whole / 60, whole % 60)
}
