use clap::{Parser, Subcommand};
use rusqlite::Connection;
use anyhow::Result;
use crate::config::Config;
use crate::db::DbConnection;
use crate::models::{
    ColumnPayload, FunnelColumnPayload, FunnelPayload, LeadPayload, Principal, TaskPayload,
    DEFAULT_STAGE_COLOR,
};
use crate::ordering::Collection;
use crate::repo::{
    FunnelColumnKind, FunnelRepo, LeadKind, TaskColumnKind, TaskKind, UserRepo,
};
use crate::cli::error::{parse_priority, user_error};
use crate::cli::output::{
    format_columns, format_funnels, format_json, format_leads, format_stages, format_tasks,
    format_users,
};

#[derive(Parser)]
#[command(name = "funnelboard")]
#[command(about = "Funnelboard - kanban task boards and sales funnels")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Act as this user id (defaults to `user=` in ~/.funnelboard/rc)
    #[arg(long, global = true)]
    pub user: Option<i64>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage users
    Users {
        #[command(subcommand)]
        subcommand: UserCommands,
    },
    /// Manage your kanban columns
    Columns {
        #[command(subcommand)]
        subcommand: ColumnCommands,
    },
    /// Manage tasks within a column
    Tasks {
        #[command(subcommand)]
        subcommand: TaskCommands,
    },
    /// Manage sales funnels
    Funnels {
        #[command(subcommand)]
        subcommand: FunnelCommands,
    },
    /// Manage the stages of a funnel
    Stages {
        #[command(subcommand)]
        subcommand: StageCommands,
    },
    /// Manage leads within a stage
    Leads {
        #[command(subcommand)]
        subcommand: LeadCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user
    Add {
        name: String,
    },
    /// List users
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ColumnCommands {
    /// List columns (creates To-do/In Progress/Done on first use)
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Add a column at the end
    Add {
        name: String,
    },
    /// Rename a column
    Rename {
        id: i64,
        name: String,
    },
    /// Delete a column and its tasks
    Rm {
        id: i64,
    },
    /// Move a column to a zero-based position
    Reorder {
        id: i64,
        index: usize,
    },
    /// Rewrite column positions as 0..N-1
    Repair,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List tasks in a column
    List {
        column: i64,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Add a task at the end of a column
    Add {
        column: i64,
        title: String,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Edit task fields
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        /// low, medium or high
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a task
    Rm {
        id: i64,
    },
    /// Move a task to a zero-based position in its column
    Reorder {
        id: i64,
        index: usize,
    },
    /// Move a task to another column at a zero-based position
    Move {
        id: i64,
        column: i64,
        index: usize,
    },
    /// Rewrite task positions in a column as 0..N-1
    Repair {
        column: i64,
    },
}

#[derive(Subcommand)]
pub enum FunnelCommands {
    /// List your funnels
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Create a funnel
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Rename a funnel
    Rename {
        id: i64,
        name: String,
    },
    /// Delete a funnel with its stages and leads
    Rm {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum StageCommands {
    /// List a funnel's stages (creates the default pipeline on first use)
    List {
        funnel: i64,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Add a stage at the end of a funnel
    Add {
        funnel: i64,
        name: String,
        /// Hex color (#rgb or #rrggbb)
        #[arg(long)]
        color: Option<String>,
    },
    /// Edit stage name or color
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a stage and its leads
    Rm {
        id: i64,
    },
    /// Move a stage to a zero-based position
    Reorder {
        id: i64,
        index: usize,
    },
    /// Move a stage to another funnel at a zero-based position
    Move {
        id: i64,
        funnel: i64,
        index: usize,
    },
    /// Rewrite stage positions in a funnel as 0..N-1
    Repair {
        funnel: i64,
    },
}

#[derive(Subcommand)]
pub enum LeadCommands {
    /// List leads in a stage
    List {
        stage: i64,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Add a lead at the end of a stage
    Add {
        stage: i64,
        name: String,
        #[command(flatten)]
        fields: LeadFields,
    },
    /// Edit lead fields
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: LeadFields,
    },
    /// Delete a lead
    Rm {
        id: i64,
    },
    /// Move a lead to a zero-based position in its stage
    Reorder {
        id: i64,
        index: usize,
    },
    /// Move a lead to another stage at a zero-based position
    Move {
        id: i64,
        stage: i64,
        index: usize,
    },
    /// Rewrite lead positions in a stage as 0..N-1
    Repair {
        stage: i64,
    },
}

#[derive(clap::Args, Default)]
pub struct LeadFields {
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    /// Deal value
    #[arg(long)]
    pub value: Option<f64>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl LeadFields {
    /// Overlay the given fields onto a payload
    fn apply_to(self, payload: &mut LeadPayload) {
        if self.email.is_some() {
            payload.email = self.email;
        }
        if self.phone.is_some() {
            payload.phone = self.phone;
        }
        if self.company.is_some() {
            payload.company = self.company;
        }
        if self.value.is_some() {
            payload.value = self.value;
        }
        if self.notes.is_some() {
            payload.notes = self.notes;
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let conn = DbConnection::connect()?;

    let principal = cli.user.or(config.user).map(Principal::new);
    handle_command(&conn, cli.command, principal)
}

/// Resolve the acting user or exit with a hint
fn require_principal(principal: Option<Principal>) -> Principal {
    principal.unwrap_or_else(|| {
        user_error("No user selected. Pass --user <ID> or set user=<ID> in ~/.funnelboard/rc.")
    })
}

fn handle_command(conn: &Connection, command: Commands, principal: Option<Principal>) -> Result<()> {
    match command {
        Commands::Users { subcommand } => handle_users(conn, subcommand),
        Commands::Columns { subcommand } => handle_columns(conn, subcommand, &require_principal(principal)),
        Commands::Tasks { subcommand } => handle_tasks(conn, subcommand, &require_principal(principal)),
        Commands::Funnels { subcommand } => handle_funnels(conn, subcommand, &require_principal(principal)),
        Commands::Stages { subcommand } => handle_stages(conn, subcommand, &require_principal(principal)),
        Commands::Leads { subcommand } => handle_leads(conn, subcommand, &require_principal(principal)),
    }
}

fn handle_users(conn: &Connection, cmd: UserCommands) -> Result<()> {
    match cmd {
        UserCommands::Add { name } => {
            let user = UserRepo::create(conn, &name)?;
            println!("Created user {}: {}", user.id, user.name);
        }
        UserCommands::List { json } => {
            let users = UserRepo::list(conn)?;
            if json {
                println!("{}", format_json(&users)?);
            } else {
                println!("{}", format_users(&users));
            }
        }
    }
    Ok(())
}

fn handle_columns(conn: &Connection, cmd: ColumnCommands, principal: &Principal) -> Result<()> {
    type Columns = Collection<TaskColumnKind>;
    let board = principal.user_id;

    match cmd {
        ColumnCommands::List { json } => {
            let columns = Columns::list(conn, board, principal)?;
            if json {
                println!("{}", format_json(&columns)?);
            } else {
                println!("{}", format_columns(&columns));
            }
        }
        ColumnCommands::Add { name } => {
            let column = Columns::append(conn, board, &ColumnPayload::new(name), principal)?;
            println!("Created column {} at position {}: {}", column.id, column.order, column.name);
        }
        ColumnCommands::Rename { id, name } => {
            let column = Columns::update(conn, id, &ColumnPayload::new(name), principal)?;
            println!("Renamed column {} to {}", column.id, column.name);
        }
        ColumnCommands::Rm { id } => {
            Columns::remove(conn, id, principal)?;
            println!("Deleted column {}", id);
        }
        ColumnCommands::Reorder { id, index } => {
            Columns::reorder(conn, id, index, principal)?;
            println!("Moved column {} to position {}", id, index);
        }
        ColumnCommands::Repair => {
            let written = Columns::repair(conn, board, principal)?;
            println!("Repaired columns ({} rewritten)", written);
        }
    }
    Ok(())
}

fn handle_tasks(conn: &Connection, cmd: TaskCommands, principal: &Principal) -> Result<()> {
    type Tasks = Collection<TaskKind>;

    match cmd {
        TaskCommands::List { column, json } => {
            let tasks = Tasks::list(conn, column, principal)?;
            if json {
                println!("{}", format_json(&tasks)?);
            } else {
                println!("{}", format_tasks(&tasks));
            }
        }
        TaskCommands::Add { column, title, priority, description } => {
            let payload = TaskPayload {
                title,
                description,
                priority: parse_priority(&priority)?,
            };
            let task = Tasks::append(conn, column, &payload, principal)?;
            println!("Created task {} at position {}: {}", task.id, task.order, task.title);
        }
        TaskCommands::Edit { id, title, priority, description } => {
            let priority = priority.as_deref().map(parse_priority).transpose()?;
            let current = Tasks::get(conn, id, principal)?;
            let payload = TaskPayload {
                title: title.unwrap_or(current.title),
                description: description.or(current.description),
                priority: priority.unwrap_or(current.priority),
            };
            let task = Tasks::update(conn, id, &payload, principal)?;
            println!("Modified task {}: {}", task.id, task.title);
        }
        TaskCommands::Rm { id } => {
            Tasks::remove(conn, id, principal)?;
            println!("Deleted task {}", id);
        }
        TaskCommands::Reorder { id, index } => {
            Tasks::reorder(conn, id, index, principal)?;
            println!("Moved task {} to position {}", id, index);
        }
        TaskCommands::Move { id, column, index } => {
            Tasks::move_to(conn, id, column, index, principal)?;
            println!("Moved task {} to column {} at position {}", id, column, index);
        }
        TaskCommands::Repair { column } => {
            let written = Tasks::repair(conn, column, principal)?;
            println!("Repaired column {} ({} rewritten)", column, written);
        }
    }
    Ok(())
}

fn handle_funnels(conn: &Connection, cmd: FunnelCommands, principal: &Principal) -> Result<()> {
    match cmd {
        FunnelCommands::List { json } => {
            let funnels = FunnelRepo::list_for_user(conn, principal)?;
            if json {
                println!("{}", format_json(&funnels)?);
            } else {
                println!("{}", format_funnels(&funnels));
            }
        }
        FunnelCommands::Add { name, description } => {
            let payload = FunnelPayload { name, description };
            let funnel = FunnelRepo::create(conn, &payload, principal)?;
            println!("Created funnel {}: {}", funnel.id, funnel.name);
        }
        FunnelCommands::Rename { id, name } => {
            let current = FunnelRepo::get_owned(conn, id, principal)?;
            let payload = FunnelPayload { name, description: current.description };
            let funnel = FunnelRepo::update(conn, id, &payload, principal)?;
            println!("Renamed funnel {} to {}", funnel.id, funnel.name);
        }
        FunnelCommands::Rm { id } => {
            FunnelRepo::delete(conn, id, principal)?;
            println!("Deleted funnel {}", id);
        }
    }
    Ok(())
}

fn handle_stages(conn: &Connection, cmd: StageCommands, principal: &Principal) -> Result<()> {
    type Stages = Collection<FunnelColumnKind>;

    match cmd {
        StageCommands::List { funnel, json } => {
            let stages = Stages::list(conn, funnel, principal)?;
            if json {
                println!("{}", format_json(&stages)?);
            } else {
                println!("{}", format_stages(&stages));
            }
        }
        StageCommands::Add { funnel, name, color } => {
            let payload = FunnelColumnPayload::new(name, color.unwrap_or_else(|| DEFAULT_STAGE_COLOR.to_string()));
            let stage = Stages::append(conn, funnel, &payload, principal)?;
            println!("Created stage {} at position {}: {}", stage.id, stage.order, stage.name);
        }
        StageCommands::Edit { id, name, color } => {
            let current = Stages::get(conn, id, principal)?;
            let payload = FunnelColumnPayload::new(
                name.unwrap_or(current.name),
                color.unwrap_or(current.color),
            );
            let stage = Stages::update(conn, id, &payload, principal)?;
            println!("Modified stage {}: {}", stage.id, stage.name);
        }
        StageCommands::Rm { id } => {
            Stages::remove(conn, id, principal)?;
            println!("Deleted stage {}", id);
        }
        StageCommands::Reorder { id, index } => {
            Stages::reorder(conn, id, index, principal)?;
            println!("Moved stage {} to position {}", id, index);
        }
        StageCommands::Move { id, funnel, index } => {
            Stages::move_to(conn, id, funnel, index, principal)?;
            println!("Moved stage {} to funnel {} at position {}", id, funnel, index);
        }
        StageCommands::Repair { funnel } => {
            let written = Stages::repair(conn, funnel, principal)?;
            println!("Repaired funnel {} ({} rewritten)", funnel, written);
        }
    }
    Ok(())
}

fn handle_leads(conn: &Connection, cmd: LeadCommands, principal: &Principal) -> Result<()> {
    type Leads = Collection<LeadKind>;

    match cmd {
        LeadCommands::List { stage, json } => {
            let leads = Leads::list(conn, stage, principal)?;
            if json {
                println!("{}", format_json(&leads)?);
            } else {
                println!("{}", format_leads(&leads));
            }
        }
        LeadCommands::Add { stage, name, fields } => {
            let mut payload = LeadPayload::new(name);
            fields.apply_to(&mut payload);
            let lead = Leads::append(conn, stage, &payload, principal)?;
            println!("Created lead {} at position {}: {}", lead.id, lead.order, lead.name);
        }
        LeadCommands::Edit { id, name, fields } => {
            let current = Leads::get(conn, id, principal)?;
            let mut payload = LeadPayload {
                name: name.unwrap_or(current.name),
                email: current.email,
                phone: current.phone,
                company: current.company,
                value: current.value,
                notes: current.notes,
            };
            fields.apply_to(&mut payload);
            let lead = Leads::update(conn, id, &payload, principal)?;
            println!("Modified lead {}: {}", lead.id, lead.name);
        }
        LeadCommands::Rm { id } => {
            Leads::remove(conn, id, principal)?;
            println!("Deleted lead {}", id);
        }
        LeadCommands::Reorder { id, index } => {
            Leads::reorder(conn, id, index, principal)?;
            println!("Moved lead {} to position {}", id, index);
        }
        LeadCommands::Move { id, stage, index } => {
            Leads::move_to(conn, id, stage, index, principal)?;
            println!("Moved lead {} to stage {} at position {}", id, stage, index);
        }
        LeadCommands::Repair { stage } => {
            let written = Leads::repair(conn, stage, principal)?;
            println!("Repaired stage {} ({} rewritten)", stage, written);
        }
    }
    Ok(())
}
