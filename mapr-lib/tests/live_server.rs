//! Integration tests against a real OMERO.web server.
//!
//! These tests need network access and are ignored by default. To run them,
//! create a `.env` file in the mapr-lib directory with:
//!
//! ```env
//! MAPR_URL=https://idr.openmicroscopy.org
//! # Optional, anonymous access otherwise
//! MAPR_SESSION=your-session-key
//! ```
//!
//! Then run: `cargo test -p mapr-lib -- --ignored`

use std::env;
use std::time::Duration;

use mapr_lib::MaprClient;
use mapr_lib::StaticSession;
use mapr_lib::api::FilterHandle;
use mapr_lib::api::Search;
use mapr_lib::config::Layout;
use mapr_lib::config::MenuRegistry;
use mapr_lib::config::TreeSettings;
use mapr_lib::model::NodeKind;
use mapr_lib::tree::Tree;

fn live_client() -> Option<MaprClient> {
    let _ = dotenvy::dotenv();

    let url = env::var("MAPR_URL").ok()?;
    let session = match env::var("MAPR_SESSION") {
        Ok(key) => StaticSession::new(key),
        Err(_) => StaticSession::anonymous(),
    };

    MaprClient::builder()
        .url(url)
        .session(session)
        .timeout(Duration::from_secs(30))
        .build()
        .ok()
}

#[tokio::test]
#[ignore = "requires MAPR_URL in .env file"]
async fn test_gene_tree_loads() {
    let client = live_client().expect("Missing MAPR_URL. See module docs.");
    let menus = MenuRegistry::default();
    let settings = TreeSettings::new().with_layout(Layout::Mapr).with_menu("gene");

    let loader = settings
        .loader(client, FilterHandle::new(), &menus)
        .expect("gene is a stock menu");
    let mut tree = Tree::new(loader, settings.comparator(), settings.registry());
    tree.load_root().await;

    let genes = &tree.roots()[0];
    assert_eq!(genes.kind, NodeKind::Experimenter);
    println!("{} top-level values", genes.children.len());
}

#[tokio::test]
#[ignore = "requires MAPR_URL in .env file"]
async fn test_gene_autocomplete() {
    let client = live_client().expect("Missing MAPR_URL. See module docs.");
    let menus = MenuRegistry::default();
    let settings = TreeSettings::new().with_layout(Layout::Mapr).with_menu("gene");
    let routes = settings.routes(&menus).unwrap();

    let search = Search::new(client, routes.autocomplete().unwrap());
    let suggestions = search.try_search("cdc20").await.unwrap();
    for suggestion in &suggestions {
        println!("{} -> {:?}", suggestion.label, suggestion.term());
    }
}
