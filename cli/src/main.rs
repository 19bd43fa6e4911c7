use clap::{Parser, Subcommand};
use learnhub::error::{AppError, AppResult};
use learnhub::gamification::AchievementKind;
use learnhub::model::entity::{
    Achievement, AchievementCreate, Difficulty, Exercise, ExerciseCreate, Lesson, LessonCreate,
    LessonKind, UserEntity, UserEntityCreateUpdate,
};
use learnhub::model::{CrudRepository, DbConnection, ModelManager};
use learnhub::web::{AuthenticatedUser, UserRole};

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the learnhub DB", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage lessons, guidelines and examples
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },

    /// Manage exercises
    Exercise {
        #[command(subcommand)]
        action: ExerciseCommands,
    },

    /// Manage the achievement catalogue
    Achievement {
        #[command(subcommand)]
        action: AchievementCommands,
    },
}

/// User management
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// `user` or `admin`
        #[arg(long, default_value = "user")]
        role: String,
    },
}

/// Lesson management
#[derive(Subcommand, Debug)]
pub enum LessonCommands {
    Add {
        #[arg(long)]
        slug: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Path to a Markdown file with lesson content
        #[arg(long)]
        file: String,
        /// `lesson`, `guideline` or `example`
        #[arg(long, default_value = "lesson", value_parser = parse_lesson_kind)]
        kind: LessonKind,
        #[arg(long)]
        points: Option<i32>,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

/// Exercise management
#[derive(Subcommand, Debug)]
pub enum ExerciseCommands {
    Add {
        /// Slug of the lesson to attach the exercise to
        #[arg(long)]
        lesson_slug: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        prompt: String,
        #[arg(long, default_value = "")]
        hint: String,
        /// `easy`, `medium` or `hard`
        #[arg(long, default_value = "easy", value_parser = parse_difficulty)]
        difficulty: Difficulty,
        /// Defaults to the difficulty's reward
        #[arg(long)]
        points: Option<i32>,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

/// Achievement management
#[derive(Subcommand, Debug)]
pub enum AchievementCommands {
    Add {
        #[arg(long)]
        code: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// `points`, `streak`, `lessons` or `exercises`
        #[arg(long, value_parser = parse_achievement_kind)]
        kind: AchievementKind,
        #[arg(long)]
        threshold: i64,
        #[arg(long, default_value = "star")]
        icon: String,
    },
}

fn parse_lesson_kind(value: &str) -> Result<LessonKind, String> {
    LessonKind::try_from(value.to_string())
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    Difficulty::try_from(value.to_string())
}

fn parse_achievement_kind(value: &str) -> Result<AchievementKind, String> {
    AchievementKind::try_from(value)
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| AppError::InvalidInput("DATABASE_URL is not set".to_string()))?;
    let db_con = DbConnection::connect(&database_url)?;
    db_con.migrate().await?;

    let mm = ModelManager::new(db_con);
    let actor = AuthenticatedUser::admin();

    match args.command {
        Commands::User { action } => match action {
            UserCommands::Add { username, password, role } => {
                let user = UserEntity::create(
                    &mm,
                    &actor,
                    UserEntityCreateUpdate {
                        username,
                        password_hash: learnhub::auth::hash_password(&password)?,
                    },
                )
                .await?;

                let user = match UserRole::from(role.as_str()) {
                    UserRole::Admin => user.set_role(&mm, &actor, UserRole::Admin).await?,
                    UserRole::User => user,
                };
                println!("User created: {:?}", user);
            }
        },

        Commands::Lesson { action } => match action {
            LessonCommands::Add {
                slug,
                title,
                description,
                file,
                kind,
                points,
                order_index,
            } => {
                let content = std::fs::read_to_string(file)?;
                let lesson = Lesson::create(
                    &mm,
                    &actor,
                    LessonCreate {
                        slug,
                        title,
                        description,
                        content,
                        kind,
                        points,
                        order_index: Some(order_index),
                    },
                )
                .await?;
                println!("Lesson created: {} ({})", lesson.slug(), lesson.id());
            }
        },

        Commands::Exercise { action } => match action {
            ExerciseCommands::Add {
                lesson_slug,
                title,
                prompt,
                hint,
                difficulty,
                points,
                order_index,
            } => {
                let lesson = Lesson::find_by_slug(&mm, &actor, &lesson_slug)
                    .await?
                    .ok_or_else(|| {
                        AppError::InvalidInput(format!("no lesson with slug `{lesson_slug}`"))
                    })?;

                let exercise = Exercise::create(
                    &mm,
                    &actor,
                    ExerciseCreate {
                        lesson_id: lesson.id(),
                        title,
                        prompt,
                        hint,
                        difficulty,
                        points,
                        order_index: Some(order_index),
                    },
                )
                .await?;
                println!("Exercise created: {:?}", exercise);
            }
        },

        Commands::Achievement { action } => match action {
            AchievementCommands::Add {
                code,
                title,
                description,
                kind,
                threshold,
                icon,
            } => {
                let achievement = Achievement::create(
                    &mm,
                    &actor,
                    AchievementCreate {
                        code,
                        title,
                        description,
                        kind,
                        threshold,
                        icon,
                    },
                )
                .await?;
                println!("Achievement created: {:?}", achievement);
            }
        },
    }

    Ok(())
}
