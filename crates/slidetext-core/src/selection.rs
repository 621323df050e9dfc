//! Single-box selection and control-panel mirroring.

use crate::controls::ControlPanel;
use crate::document::OverlayDocument;
use crate::effect::{Effect, EffectQueue};
use crate::error::{EditorError, EditorResult};
use crate::text_box::BoxId;

/// Tracks the one box the control panel currently edits.
///
/// Only `select` and `clear` write the selection; everything else
/// reads it through `selected`.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: Option<BoxId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected box, if any.
    pub fn selected(&self) -> Option<BoxId> {
        self.selected
    }

    pub fn is_selected(&self, id: BoxId) -> bool {
        self.selected == Some(id)
    }

    /// Select a box and load its attributes into the control panel.
    ///
    /// The previously selected box loses its marker. Reselecting the
    /// current box only reloads the fields.
    pub fn select(
        &mut self,
        id: BoxId,
        document: &OverlayDocument,
        panel: &mut ControlPanel,
        effects: &mut EffectQueue,
    ) -> EditorResult<()> {
        let text_box = document.get(id).ok_or(EditorError::UnknownBox(id))?;

        if self.selected != Some(id) {
            if let Some(previous) = self.selected.take() {
                effects.push(Effect::MarkerChanged {
                    id: previous,
                    active: false,
                });
            }
            self.selected = Some(id);
            effects.push(Effect::MarkerChanged { id, active: true });
            log::debug!("Selected box {}", id);
        }

        panel.load_from(text_box);
        effects.push(Effect::ControlsChanged);
        Ok(())
    }

    /// Drop the selection and blank the text field.
    pub fn clear(&mut self, panel: &mut ControlPanel, effects: &mut EffectQueue) {
        if let Some(previous) = self.selected.take() {
            effects.push(Effect::MarkerChanged {
                id: previous,
                active: false,
            });
            log::debug!("Cleared selection of box {}", previous);
        }
        if !panel.text.is_empty() {
            panel.text.clear();
            effects.push(Effect::ControlsChanged);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide_host::SlideId;
    use crate::text_box::{BoxStyle, TextBox};

    fn document_with(contents: &[&str]) -> (OverlayDocument, Vec<BoxId>) {
        let mut doc = OverlayDocument::new();
        let ids = contents
            .iter()
            .map(|content| doc.add_box(TextBox::new(SlideId(0), *content, BoxStyle::default())))
            .collect();
        (doc, ids)
    }

    fn marker_changes(effects: &mut EffectQueue) -> Vec<(BoxId, bool)> {
        effects
            .take()
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::MarkerChanged { id, active } => Some((id, active)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_select_moves_marker() {
        let (doc, ids) = document_with(&["one", "two"]);
        let mut selection = SelectionManager::new();
        let mut panel = ControlPanel::default();
        let mut effects = EffectQueue::new();

        selection.select(ids[0], &doc, &mut panel, &mut effects).unwrap();
        assert_eq!(marker_changes(&mut effects), vec![(ids[0], true)]);

        selection.select(ids[1], &doc, &mut panel, &mut effects).unwrap();
        assert_eq!(
            marker_changes(&mut effects),
            vec![(ids[0], false), (ids[1], true)]
        );
        assert_eq!(panel.text, "two");
    }

    #[test]
    fn test_reselect_does_not_reapply_marker() {
        let (doc, ids) = document_with(&["one"]);
        let mut selection = SelectionManager::new();
        let mut panel = ControlPanel::default();
        let mut effects = EffectQueue::new();

        selection.select(ids[0], &doc, &mut panel, &mut effects).unwrap();
        effects.take();
        selection.select(ids[0], &doc, &mut panel, &mut effects).unwrap();
        assert!(marker_changes(&mut effects).is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (doc, ids) = document_with(&["one"]);
        let mut selection = SelectionManager::new();
        let mut panel = ControlPanel::default();
        let mut effects = EffectQueue::new();

        selection.select(ids[0], &doc, &mut panel, &mut effects).unwrap();
        selection.clear(&mut panel, &mut effects);
        assert_eq!(selection.selected(), None);
        assert_eq!(panel.text, "");

        effects.take();
        let before = panel.clone();
        selection.clear(&mut panel, &mut effects);
        assert!(effects.is_empty());
        assert_eq!(panel, before);
    }

    #[test]
    fn test_select_unknown_box() {
        let (doc, _) = document_with(&[]);
        let mut selection = SelectionManager::new();
        let mut panel = ControlPanel::default();
        let mut effects = EffectQueue::new();
        let missing = uuid::Uuid::new_v4();

        assert_eq!(
            selection.select(missing, &doc, &mut panel, &mut effects),
            Err(EditorError::UnknownBox(missing))
        );
        assert_eq!(selection.selected(), None);
    }
}
