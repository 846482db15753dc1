use graph_explorer::{
    AttributeMap, ComparisonOp, Filter, Graph, Node, PlatformConfig, TextRenderer, VertexId,
    WorkspaceManager,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => PlatformConfig::from_file(&path)?,
        None => PlatformConfig::default(),
    };

    // Initialize tracing; RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("Graph Explorer v{}", graph_explorer::version());
    println!("==========================================");
    println!();

    let mut manager = WorkspaceManager::new(config);
    let id = manager.create_workspace(Some(community_graph()?));
    let workspace = manager
        .active_mut()
        .ok_or_else(|| anyhow::anyhow!("workspace {} is not active", id))?;
    let platform = &mut workspace.platform;

    // Listener: counts notifications
    let updates = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&updates);
    platform.add_listener(Arc::new(move || -> anyhow::Result<()> {
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }));

    // Subscriber: drains tree snapshots on its own task
    let (subscriber, mut snapshots) = platform.subscribe();
    let drain = tokio::spawn(async move {
        let mut received = 0usize;
        while let Some(snapshot) = snapshots.recv().await {
            received += 1;
            info!(
                "Subscriber {} got snapshot #{}: {} roots, selected {:?}",
                subscriber,
                received,
                snapshot.treeview.len(),
                snapshot.selected_id
            );
        }
        received
    });

    platform.set_renderer(Box::new(TextRenderer::new()));

    println!("=== Demo 1: Forest ===");
    let alice = VertexId::new("alice");
    if let Some(root) = platform.forest().find_tree_id(&[alice.clone()]) {
        platform.expand_tree(root);
    }
    platform.select_node(&VertexId::new("dave"));
    print!("{}", platform.render_outline());

    println!("\n=== Demo 2: Mutation keeps expansions ===");
    let mut erin = Node::new("erin");
    erin.set_attribute("type", "member")?;
    erin.set_attribute("age", 41i64)?;
    platform.add_vertex(erin);
    platform.create_edge(&alice, &VertexId::new("erin"), AttributeMap::new());
    print!("{}", platform.render_outline());

    println!("\n=== Demo 3: Filters ===");
    platform.add_filter(Filter::comparison("age", ComparisonOp::Ge, 30i64));
    for descriptor in platform.list_filters() {
        println!("  filter: {}", serde_json::to_string(&descriptor)?);
    }
    let data = platform.get_graph_data();
    println!(
        "  visible: {} vertices, {} links",
        data.nodes.len(),
        data.links.len()
    );
    if let Some(view) = platform.render_main_view() {
        println!("{}", view);
    }
    platform.clear_filters();

    println!("\n=== Demo 4: Community export ===");
    println!("{}", platform.export_community()?);

    println!("\n  listener notifications: {}", updates.load(Ordering::Relaxed));
    drop(manager);
    let snapshots = drain.await?;
    println!("  subscriber snapshots:   {}", snapshots);

    Ok(())
}

fn community_graph() -> anyhow::Result<Graph> {
    let mut graph = Graph::undirected();
    for (id, name, age) in [
        ("alice", "Alice", 34i64),
        ("bob", "Bob", 27),
        ("carol", "Carol", 45),
        ("dave", "Dave", 19),
    ] {
        let mut node = Node::new(id);
        node.set_attribute("type", "member")?;
        node.set_attribute("name", name)?;
        node.set_attribute("age", age)?;
        graph.add_vertex(node)?;
    }
    let mut loner = Node::new("frank");
    loner.set_attribute("name", "Frank")?;
    graph.add_vertex(loner)?;

    for (a, b) in [("alice", "bob"), ("bob", "carol"), ("carol", "dave")] {
        graph.create_edge(&VertexId::new(a), &VertexId::new(b), AttributeMap::new())?;
    }
    Ok(graph)
}
