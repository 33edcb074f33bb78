mod cli;

use todo_desk::api::HttpBackend;
use todo_desk::app::{TodoListController, WorkingTicker};
use todo_desk::config::Config;
use todo_desk::criteria::{Criteria, SortCriteria};
use todo_desk::library::{Author, BookSortKey, LibraryView};
use todo_desk::storage::{JsonFileStore, KeyValueStore};
use todo_desk::todo::{Todo, timestamp};
use todo_desk::utils::markdown::render_plain;
use todo_desk::utils::paths::get_logs_dir;
use todo_desk::utils::unicode::{pad_to_width, truncate_to_width};

use anyhow::{Result, anyhow};
use clap::Parser;
use cli::{Cli, Commands, TodoFields};
use std::fs;
use std::io::Write;

type Controller = TodoListController<JsonFileStore>;

const TITLE_WIDTH: usize = 40;

/// Initialize file-based logging.
///
/// Logs are written to ~/.todo-desk/logs/tododesk.log (rolling daily).
/// Log level can be controlled with RUST_LOG env var (default: info).
fn init_file_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let logs_dir = match get_logs_dir() {
        Ok(dir) => dir,
        Err(_) => return None,
    };

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: Could not create logs directory: {}", e);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "tododesk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Some(guard)
}

fn main() -> Result<()> {
    // Guard must be kept alive for the duration of the process
    let _log_guard = init_file_logging();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    tracing::info!("tododesk starting against {}", config.base_url);

    let backend = HttpBackend::new(&config)?;
    let store = JsonFileStore::open_default()?;

    match cli.command.unwrap_or(Commands::List {
        filter: None,
        sort: None,
        search: None,
    }) {
        Commands::List {
            filter,
            sort,
            search,
        } => {
            let mut controller = load_controller(store, &backend)?;
            handle_list(&mut controller, filter, sort, search)?;
        }
        Commands::Sidebar => {
            let mut controller = load_controller(store, &backend)?;
            handle_sidebar(&mut controller);
        }
        Commands::Add { title, fields } => {
            let mut controller = load_controller(store, &backend)?;
            handle_add(&mut controller, &backend, title, fields)?;
        }
        Commands::Edit { id, title, fields } => {
            let mut controller = load_controller(store, &backend)?;
            handle_edit(&mut controller, &backend, id, title, fields)?;
        }
        Commands::Toggle { id } => {
            let mut controller = load_controller(store, &backend)?;
            let todo = controller.toggle_completion(&backend, id)?;
            let state = if todo.completed { "completed" } else { "reopened" };
            println!("✓ \"{}\" {}", todo.title, state);
        }
        Commands::Delete { id, yes } => {
            let mut controller = load_controller(store, &backend)?;
            handle_delete(&mut controller, &backend, id, yes)?;
        }
        Commands::Start { id } => {
            let mut controller = load_controller(store, &backend)?;
            controller.start_working(&backend, id)?;
            println!("✓ Started working on #{}", id);
        }
        Commands::Stop => {
            let mut controller = load_controller(store, &backend)?;
            match controller.stop_working(&backend)? {
                Some(todo) => println!(
                    "✓ Stopped working on \"{}\" (total {})",
                    todo.title,
                    display_duration(&todo.working_time)
                ),
                None => println!("Not working on anything."),
            }
        }
        Commands::Watch => {
            let mut controller = load_controller(store, &backend)?;
            handle_watch(&mut controller)?;
        }
        Commands::Authors { search, add } => {
            handle_authors(LibraryView::load(store), &backend, search, add)?;
        }
        Commands::Books { search, sort, desc } => {
            handle_books(LibraryView::load(store), &backend, search, sort, desc)?;
        }
    }

    Ok(())
}

fn load_controller(store: JsonFileStore, backend: &HttpBackend) -> Result<Controller> {
    let mut controller = TodoListController::load(store);
    controller.read_todos(backend)?;
    Ok(controller)
}

fn display_duration(text: &str) -> &str {
    if text.is_empty() { "-" } else { text }
}

fn format_todo(todo: &Todo, working_on: bool) -> String {
    let check = if todo.completed { "[x]" } else { "[ ]" };
    let marker = if working_on { "▶" } else { " " };
    let id = todo.id.map(|id| format!("#{}", id)).unwrap_or_default();
    let title = pad_to_width(&truncate_to_width(&todo.title, TITLE_WIDTH), TITLE_WIDTH);

    let mut line = format!(
        "{} {:>5} {} {} {:<2} {} {}/{}",
        marker,
        id,
        check,
        todo.priority,
        todo.complexity,
        title,
        display_duration(&todo.working_time),
        display_duration(&todo.estimated_working_time),
    );
    for tag in &todo.tags {
        line.push_str(&format!(" @{}", tag));
    }
    for project in &todo.projects {
        line.push_str(&format!(" :{}", project));
    }
    line
}

fn handle_list(
    controller: &mut Controller,
    filter: Option<Criteria>,
    sort: Option<SortCriteria>,
    search: Option<String>,
) -> Result<()> {
    if let Some(filter) = filter {
        controller.change_to_filter(filter)?;
    }
    if let Some(sort) = sort {
        controller.set_sorting(sort)?;
    }
    if let Some(search) = search {
        controller.set_search(search)?;
    }

    let todos = controller.filtered_todos();
    println!(
        "\n📋 {} - {} of {} todos, sorted by {}\n",
        controller.current_filter(),
        todos.len(),
        controller.todos().len(),
        controller.sorting()
    );
    if !controller.search().is_empty() {
        println!("  search: \"{}\"\n", controller.search());
    }

    if todos.is_empty() {
        println!("No todos!");
    }
    let working = controller.working();
    for todo in &todos {
        println!("{}", format_todo(todo, working.is_working_on(todo.id)));
    }

    if working.is_active() {
        println!("\n⏱ working for {}", controller.working_time_human());
    }
    println!();
    Ok(())
}

fn handle_sidebar(controller: &mut Controller) {
    let groups = controller.sidebar().to_vec();
    for group in groups {
        println!("\n{}", group.name);
        for child in &group.children {
            let all = controller.count(&child.all_criteria);
            let counts = match &child.not_completed_criteria {
                Some(criteria) => format!("{}/{}", controller.count(criteria), all),
                None => all.to_string(),
            };
            println!(
                "  {} {:>7}  --filter {}",
                pad_to_width(&child.name, 24),
                counts,
                child.all_criteria
            );
        }
    }
    println!();
}

/// Copy the given flags onto `todo`.
fn apply_fields(todo: &mut Todo, fields: TodoFields) {
    if let Some(description) = fields.description {
        todo.description = description;
    }
    if let Some(priority) = fields.priority {
        todo.priority = priority;
    }
    if let Some(complexity) = fields.complexity {
        todo.complexity = complexity;
    }
    if let Some(working_time) = fields.working_time {
        todo.working_time = working_time;
    }
    if let Some(estimate) = fields.estimate {
        todo.estimated_working_time = estimate;
    }
    if !fields.tags.is_empty() {
        todo.tags = fields.tags;
    }
    if !fields.projects.is_empty() {
        todo.projects = fields.projects;
    }
}

/// Print the validation messages when the controller refused the todo.
fn report_invalid(controller: &Controller, result: Result<Todo>) -> Result<Todo> {
    if result.is_err() && !controller.validation().is_valid() {
        for (_, message) in controller.validation().messages() {
            eprintln!("{}\n", render_plain(message));
        }
    }
    result
}

fn handle_add(
    controller: &mut Controller,
    backend: &HttpBackend,
    title: String,
    fields: TodoFields,
) -> Result<()> {
    let mut todo = Controller::new_todo();
    todo.title = title;
    apply_fields(&mut todo, fields);

    let result = controller.create_todo(backend, &todo);
    let saved = report_invalid(controller, result)?;
    println!(
        "✓ Todo #{} added successfully!",
        saved.id.map(|id| id.to_string()).unwrap_or_default()
    );
    Ok(())
}

fn handle_edit(
    controller: &mut Controller,
    backend: &HttpBackend,
    id: i64,
    title: Option<String>,
    fields: TodoFields,
) -> Result<()> {
    let mut todo = controller
        .edit_copy(id)
        .ok_or_else(|| anyhow!("No todo with id {}", id))?;
    if let Some(title) = title {
        todo.title = title;
    }
    apply_fields(&mut todo, fields);

    let result = controller.update_todo(backend, &todo);
    let saved = report_invalid(controller, result)?;
    let changed = saved
        .changed
        .map(|changed| timestamp::format_timestamp(&changed))
        .unwrap_or_default();
    println!("✓ \"{}\" updated {}", saved.title, changed);
    Ok(())
}

fn handle_delete(
    controller: &mut Controller,
    backend: &HttpBackend,
    id: i64,
    yes: bool,
) -> Result<()> {
    use dialoguer::Confirm;

    let title = controller
        .find(id)
        .map(|todo| todo.title.clone())
        .ok_or_else(|| anyhow!("No todo with id {}", id))?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Do you really want to delete \"{}\"?", title))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Nothing deleted.");
            return Ok(());
        }
    }

    controller.delete_todo(backend, id)?;
    println!("✓ Deleted \"{}\"", title);
    Ok(())
}

fn handle_watch(controller: &mut Controller) -> Result<()> {
    let working = controller.working();
    let Some(id) = working.id.filter(|_| working.is_active()) else {
        println!("Not working on anything.");
        return Ok(());
    };
    let title = controller
        .find(id)
        .map(|todo| todo.title.clone())
        .unwrap_or_else(|| format!("#{}", id));

    println!("⏱ Working on \"{}\" (Ctrl-C to leave)", title);
    let (_ticker, rx) = WorkingTicker::every_second(working);
    let mut stdout = std::io::stdout();
    for elapsed in rx {
        write!(stdout, "\r  {:<20}", elapsed)?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_authors<S: KeyValueStore>(
    mut view: LibraryView<S>,
    backend: &HttpBackend,
    search: Option<String>,
    add: Option<String>,
) -> Result<()> {
    if let Some(search) = search {
        view.set_author_search(search)?;
    }

    if let Some(full_name) = add {
        let author = Author::new(full_name);
        if let Err(e) = view.add_author(backend, &author) {
            eprintln!("{}", render_plain(&e.to_string()));
            return Err(e);
        }
        println!("✓ Author \"{}\" created", author.full_name);
    } else {
        view.read_authors(backend)?;
    }

    for author in view.visible_authors() {
        let count = author.count.map(|count| count.to_string()).unwrap_or_default();
        println!("{} {:>4}", pad_to_width(&author.full_name, TITLE_WIDTH), count);
    }
    Ok(())
}

fn handle_books<S: KeyValueStore>(
    mut view: LibraryView<S>,
    backend: &HttpBackend,
    search: Option<String>,
    sort: BookSortKey,
    desc: bool,
) -> Result<()> {
    if let Some(search) = search {
        view.set_book_search(search)?;
    }
    view.read_books(backend)?;

    for book in view.visible_books(sort, desc) {
        let authors: Vec<&str> = book
            .authors
            .iter()
            .map(|author| author.full_name.as_str())
            .collect();
        println!(
            "{} {} {:>5}p {}",
            pad_to_width(&truncate_to_width(&book.title, TITLE_WIDTH), TITLE_WIDTH),
            pad_to_width(&truncate_to_width(&authors.join(", "), 30), 30),
            book.pages,
            book.rating.as_deref().unwrap_or("")
        );
    }
    Ok(())
}
