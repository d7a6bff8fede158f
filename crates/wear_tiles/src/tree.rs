//! Layout tree management

use slotmap::SecondaryMap;
use taffy::prelude::*;

use crate::error::Result;
use crate::view::ViewId;

/// Maps view ids onto the Taffy nodes that measure them
pub struct LayoutTree {
    taffy: TaffyTree<()>,
    node_map: SecondaryMap<ViewId, NodeId>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self {
            taffy: TaffyTree::new(),
            node_map: SecondaryMap::new(),
        }
    }

    /// Create the layout node for a view
    pub fn create_node(&mut self, view: ViewId, style: Style) -> Result<()> {
        let taffy_node = self.taffy.new_leaf(style)?;
        self.node_map.insert(view, taffy_node);
        Ok(())
    }

    /// Add a child to a parent node
    pub fn add_child(&mut self, parent: ViewId, child: ViewId) -> Result<()> {
        if let (Some(&parent_node), Some(&child_node)) =
            (self.node_map.get(parent), self.node_map.get(child))
        {
            self.taffy.add_child(parent_node, child_node)?;
        }
        Ok(())
    }

    /// Compute layout for a tree rooted at the given view
    pub fn compute_layout(&mut self, root: ViewId, available_space: Size<AvailableSpace>) -> Result<()> {
        if let Some(&taffy_node) = self.node_map.get(root) {
            self.taffy.compute_layout(taffy_node, available_space)?;
        }
        Ok(())
    }

    /// Get the computed layout for a view
    pub fn get_layout(&self, view: ViewId) -> Option<&Layout> {
        self.node_map
            .get(view)
            .and_then(|&taffy_node| self.taffy.layout(taffy_node).ok())
    }
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}
