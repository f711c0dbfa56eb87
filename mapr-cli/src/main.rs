mod cli;

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use cli::Cli;
use cli::Commands;
use log::info;
use mapr_lib::MaprClient;
use mapr_lib::StaticSession;
use mapr_lib::api::FilterHandle;
use mapr_lib::api::JsonSource;
use mapr_lib::api::Search;
use mapr_lib::api::Suggestion;
use mapr_lib::autocomplete::Autocomplete;
use mapr_lib::autocomplete::SearchConfig;
use mapr_lib::config::MenuRegistry;
use mapr_lib::config::TreeSettings;
use mapr_lib::tree::ShowTarget;
use mapr_lib::tree::Tree;
use mapr_lib::tree::resolve_show;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let menus = match &cli.config {
        Some(path) => MenuRegistry::from_file(path)?,
        None => MenuRegistry::default(),
    };

    let session = match &cli.session {
        Some(key) => StaticSession::new(key),
        None => StaticSession::anonymous(),
    };
    let client = MaprClient::builder()
        .url(&cli.url)
        .session(session)
        .timeout(Duration::from_secs(cli.timeout))
        .build()?;
    info!("Using {}", client.base_url());

    let settings = TreeSettings::new()
        .with_layout(cli.layout.into())
        .with_menu(&cli.menu);

    match cli.command {
        Commands::Tree {
            show,
            depth,
            experimenter,
        } => {
            let settings = settings.with_experimenter(experimenter);
            let mut tree = build_tree(&settings, client, FilterHandle::new(), &menus)?;
            tree.load_root().await;

            let show = show.as_deref().and_then(ShowTarget::parse);
            if let Some(path) = resolve_show(&mut tree, show.as_ref()).await {
                info!("Selected {}", path);
            }
            expand(&mut tree, depth).await;
            print_tree(&tree);
        }
        Commands::Search {
            term,
            case_sensitive,
        } => {
            let search = search(&settings, client, &menus, case_sensitive)?;
            for suggestion in search.search(&term).await {
                print_suggestion(&suggestion);
            }
        }
        Commands::Filter {
            value,
            case_sensitive,
            depth,
        } => {
            let filter = FilterHandle::new();
            let mut tree = build_tree(&settings, client.clone(), filter.clone(), &menus)?;
            tree.load_root().await;

            let search = search(&settings, client, &menus, case_sensitive)?;
            let mut search_box = Autocomplete::new(search, filter)
                .with_config(SearchConfig::new().with_case_sensitive(case_sensitive));
            search_box
                .select(&Suggestion::new(&value, &value), &mut tree, &mut ())
                .await;

            expand(&mut tree, depth).await;
            print_tree(&tree);
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            WriteLogger::init(level, Config::default(), file)?;
        }
        None => TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?,
    }
    Ok(())
}

fn build_tree<S: JsonSource>(
    settings: &TreeSettings,
    source: S,
    filter: FilterHandle,
    menus: &MenuRegistry,
) -> Result<Tree<S>> {
    let loader = settings.loader(source, filter, menus)?;
    Ok(Tree::new(loader, settings.comparator(), settings.registry()))
}

fn search<S: JsonSource>(
    settings: &TreeSettings,
    source: S,
    menus: &MenuRegistry,
    case_sensitive: bool,
) -> Result<Search<S>> {
    let routes = settings.routes(menus)?;
    let path = routes
        .autocomplete()
        .with_context(|| format!("The {} layout has no search endpoint", settings.layout))?;
    Ok(Search::new(source, path).with_scope(settings.search_scope(case_sensitive)))
}

/// Opens every parent down to `depth` levels below the first.
async fn expand<S: JsonSource>(tree: &mut Tree<S>, depth: usize) {
    for level in 0..depth {
        let parents: Vec<_> = tree
            .visible()
            .into_iter()
            .filter(|row| row.depth == level && row.node.has_children && !row.node.opened)
            .map(|row| row.path)
            .collect();
        for path in parents {
            tree.open(&path).await;
        }
    }
}

fn print_tree<S: JsonSource>(tree: &Tree<S>) {
    let selected = tree.selected();
    for row in tree.visible() {
        let node = row.node;
        let marker = match (node.has_children, node.opened) {
            (true, true) => "▾",
            (true, false) => "▸",
            (false, _) => " ",
        };
        let icon = tree
            .registry()
            .icon(node.kind)
            .and_then(|icon| icon.rsplit('/').next())
            .unwrap_or("-");
        let counter = node
            .counter()
            .map(|c| format!(" ({})", c))
            .unwrap_or_default();
        let cursor = if selected == Some(&row.path) { ">" } else { " " };

        println!(
            "{}{}{} [{}] {}{}  {}",
            cursor,
            "  ".repeat(row.depth),
            marker,
            icon,
            node.label,
            counter,
            node.qualified_id()
        );
    }
}

fn print_suggestion(suggestion: &Suggestion) {
    match suggestion.term() {
        Some(term) if term != suggestion.label => println!("{}  ({})", suggestion.label, term),
        _ => println!("{}", suggestion.label),
    }
}
