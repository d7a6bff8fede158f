//! `wear tile` - inflate a layout and dump the measured views

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::rc::Rc;
use tracing::info;
use wear_tiles::{
    ImageContent, InflatedTile, InflaterConfig, InlineImageResource, Layout, LayoutResult,
    RecordingDispatcher, StaticResourceResolver, TileInflater, UiExecutor, ViewId, ViewKind,
    ViewTree,
};

use crate::cli::{InflateArgs, TileCommands};

pub fn run(command: TileCommands, config: &InflaterConfig) -> Result<()> {
    match command {
        TileCommands::Inflate(args) => inflate(args, config),
    }
}

fn inflate(args: InflateArgs, config: &InflaterConfig) -> Result<()> {
    let mut config = config.clone();
    if let Some(density) = args.density {
        config.metrics.density = density;
    }
    if let Some(width) = args.width {
        config.metrics.width_px = width;
    }
    if let Some(height) = args.height {
        config.metrics.height_px = height;
    }

    let source = fs::read_to_string(&args.layout)
        .with_context(|| format!("Failed to read {}", args.layout.display()))?;
    let layout = Layout::from_json(&source)
        .with_context(|| format!("Invalid layout in {}", args.layout.display()))?;

    let mut resolver = StaticResourceResolver::new();
    if let Some(path) = &args.resources {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let images: BTreeMap<String, InlineImageResource> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid resources in {}", path.display()))?;
        for (id, image) in &images {
            resolver.insert_inline(id.as_str(), image);
        }
    }

    let mut executor = UiExecutor::new();
    let inflater = TileInflater::new(
        config,
        Rc::new(resolver),
        Rc::new(RecordingDispatcher::new()),
        executor.spawner(),
    );
    let tile = inflater.inflate(&layout);
    executor.run_until_stalled();

    print!("{}", render(&tile)?);
    Ok(())
}

/// Indented dump of the view tree with bounds and arc placements
fn render(tile: &InflatedTile) -> Result<String> {
    let mut out = String::new();
    let Some(root) = tile.root() else {
        out.push_str("(empty tile)\n");
        return Ok(out);
    };
    let layout = tile.compute_layout()?;
    let tree = tile.tree();
    info!("inflated {} views", tree.len());
    render_view(&tree, &layout, root, 0, &mut out)?;
    Ok(out)
}

fn render_view(
    tree: &ViewTree,
    layout: &LayoutResult,
    id: ViewId,
    depth: usize,
    out: &mut String,
) -> std::fmt::Result {
    let Some(node) = tree.get(id) else {
        return Ok(());
    };
    let bounds = layout.get(id).unwrap_or_default();
    write!(
        out,
        "{:indent$}{} [{} {} {}x{}]",
        "",
        node.kind.name(),
        bounds.x,
        bounds.y,
        bounds.width,
        bounds.height,
        indent = depth * 2
    )?;
    match &node.kind {
        ViewKind::Text(text) => write!(out, " {:?}", text.text)?,
        ViewKind::CurvedText(text) => write!(out, " {:?}", text.text)?,
        ViewKind::Spannable(spannable) => write!(out, " {:?}", spannable.run.text())?,
        ViewKind::Image(image) => {
            let state = match &image.content {
                ImageContent::Empty => "empty".to_string(),
                ImageContent::Placeholder(_) => "placeholder".to_string(),
                ImageContent::Loaded(_) => "loaded".to_string(),
                ImageContent::Failed(err) => format!("failed: {}", err),
            };
            write!(out, " {} ({})", image.resource_id, state)?;
        }
        _ => {}
    }
    if node.click.is_some() {
        out.push_str(" clickable");
    }
    out.push('\n');

    if let Some(placements) = tree.arc_layout(id, layout) {
        for (child, placement) in placements {
            let name = tree.get(child).map(|n| n.kind.name()).unwrap_or("?");
            match placement {
                Some(p) => writeln!(
                    out,
                    "{:indent$}{} @ {:.1}deg sweep {:.1}deg r={:.1}",
                    "",
                    name,
                    p.center_angle_degrees,
                    p.sweep_degrees,
                    p.radius_px,
                    indent = (depth + 1) * 2
                )?,
                None => {
                    writeln!(out, "{:indent$}{} (dropped)", "", name, indent = (depth + 1) * 2)?
                }
            }
            let curved = tree.get(child).is_some_and(|n| {
                matches!(n.kind, ViewKind::CurvedLine(_) | ViewKind::CurvedText(_))
            });
            if !curved {
                render_view(tree, layout, child, depth + 2, out)?;
            }
        }
        return Ok(());
    }

    for &child in tree.children(id) {
        render_view(tree, layout, child, depth + 1, out)?;
    }
    Ok(())
}
