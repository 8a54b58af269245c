//! Overlay state for one analysis session.
//!
//! Holds the session's analysis results (at most one per analysis type),
//! their colors, per-type visibility, and the currently selected annotation.
//! The host renders whatever `visible_annotations` returns. No pixel math is
//! needed, because the CSS boxes are already percentages of the image.

use super::geometry::{OverlayBox, PixelRect, RenderBox};
use super::palette::{ColorAssigner, PALETTE};
use super::visibility::VisibilityMap;
use crate::response::{Annotation, AnnotationCounts, AnalysisResult};
use crate::text::{LabeledField, ParseCache};
use serde::Serialize;
use std::sync::Arc;

/// One annotation ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayItem<'a> {
    pub analysis_type_id: &'a str,
    pub annotation: &'a Annotation,
    /// The analysis type's palette color. The model-suggested color is kept
    /// on `annotation.color` for hosts that want it.
    pub color: &'a str,
    pub css: OverlayBox,
}

impl OverlayItem<'_> {
    /// Color the model suggested for this annotation, if valid.
    pub fn author_color(&self) -> Option<&str> {
        self.annotation.color.as_deref()
    }

    pub fn pixel_rect(&self, render: RenderBox) -> PixelRect {
        PixelRect::from_percent(self.annotation, render)
    }
}

/// Pointer to the annotation whose details are shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub analysis_type_id: String,
    pub annotation_id: String,
}

#[derive(Debug, Default)]
pub struct AnnotationOverlay {
    results: Vec<AnalysisResult>,
    colors: ColorAssigner,
    visibility: VisibilityMap,
    selected: Option<Selection>,
}

impl AnnotationOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a result. A result for an analysis type already present replaces
    /// it in place and keeps that type's color and visibility.
    pub fn add_result(&mut self, result: AnalysisResult) {
        let type_id = result.analysis_type_id.clone();
        self.colors.assign(&type_id);
        self.visibility.register(&type_id);

        if self.selection_belongs_to(&type_id) {
            self.selected = None;
        }

        match self
            .results
            .iter_mut()
            .find(|r| r.analysis_type_id == type_id)
        {
            Some(existing) => {
                log::info!("[OVERLAY] Superseding result for '{}'", type_id);
                *existing = result;
            }
            None => {
                log::info!(
                    "[OVERLAY] Added result for '{}' ({} annotations)",
                    type_id,
                    result.annotations.len()
                );
                self.results.push(result);
            }
        }
    }

    /// Remove the result for `analysis_type_id`. Its color slot stays
    /// reserved so a later re-run gets the same color.
    pub fn remove_result(&mut self, analysis_type_id: &str) -> Option<AnalysisResult> {
        let index = self
            .results
            .iter()
            .position(|r| r.analysis_type_id == analysis_type_id)?;
        self.visibility.remove(analysis_type_id);
        if self.selection_belongs_to(analysis_type_id) {
            self.selected = None;
        }
        log::info!("[OVERLAY] Removed result for '{}'", analysis_type_id);
        Some(self.results.remove(index))
    }

    pub fn clear(&mut self) {
        self.results.clear();
        self.visibility = VisibilityMap::new();
        self.selected = None;
    }

    /// Results in insertion order.
    pub fn results(&self) -> &[AnalysisResult] {
        &self.results
    }

    pub fn result(&self, analysis_type_id: &str) -> Option<&AnalysisResult> {
        self.results
            .iter()
            .find(|r| r.analysis_type_id == analysis_type_id)
    }

    pub fn color_for(&self, analysis_type_id: &str) -> &'static str {
        self.colors.get(analysis_type_id).unwrap_or(PALETTE[0])
    }

    /// Every annotation of every visible result, in result order and then
    /// annotation order, so later boxes draw on top.
    pub fn visible_annotations(&self) -> Vec<OverlayItem<'_>> {
        self.results
            .iter()
            .filter(|r| self.visibility.is_visible(&r.analysis_type_id))
            .flat_map(|r| {
                let color = self.color_for(&r.analysis_type_id);
                r.annotations.iter().map(move |a| OverlayItem {
                    analysis_type_id: &r.analysis_type_id,
                    annotation: a,
                    color,
                    css: OverlayBox::from_annotation(a),
                })
            })
            .collect()
    }

    /// Visible annotations with their pixel rectangles for `render`.
    pub fn layout(&self, render: RenderBox) -> Vec<(OverlayItem<'_>, PixelRect)> {
        self.visible_annotations()
            .into_iter()
            .map(|item| {
                let rect = item.pixel_rect(render);
                (item, rect)
            })
            .collect()
    }

    // --- visibility ---

    pub fn is_visible(&self, analysis_type_id: &str) -> bool {
        self.visibility.is_visible(analysis_type_id)
    }

    pub fn toggle_type(&mut self, analysis_type_id: &str) -> Option<bool> {
        self.visibility.toggle(analysis_type_id)
    }

    pub fn set_visible(&mut self, analysis_type_id: &str, visible: bool) -> bool {
        self.visibility.set(analysis_type_id, visible)
    }

    /// All visible → all hidden; anything else → all visible.
    pub fn toggle_all(&mut self) -> bool {
        self.visibility.toggle_all()
    }

    pub fn visible_count(&self) -> usize {
        self.visibility.visible_count()
    }

    /// `(type id, visible)` pairs in result order.
    pub fn visibility(&self) -> Vec<(&str, bool)> {
        self.results
            .iter()
            .map(|r| {
                let id = r.analysis_type_id.as_str();
                (id, self.visibility.is_visible(id))
            })
            .collect()
    }

    // --- selection ---

    /// Select an annotation. Returns false (and leaves the selection as is)
    /// if no such annotation exists.
    pub fn select(&mut self, analysis_type_id: &str, annotation_id: &str) -> bool {
        let exists = self
            .result(analysis_type_id)
            .and_then(|r| r.find_annotation(annotation_id))
            .is_some();
        if exists {
            self.selected = Some(Selection {
                analysis_type_id: analysis_type_id.to_string(),
                annotation_id: annotation_id.to_string(),
            });
        }
        exists
    }

    /// Select the topmost visible annotation under a pixel position. A miss
    /// clears the selection.
    pub fn select_at(&mut self, px: f64, py: f64, render: RenderBox) -> Option<Selection> {
        let hit = self
            .layout(render)
            .into_iter()
            .rev()
            .find(|(_, rect)| rect.contains(px, py))
            .map(|(item, _)| Selection {
                analysis_type_id: item.analysis_type_id.to_string(),
                annotation_id: item.annotation.id.clone(),
            });
        self.selected = hit.clone();
        hit
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&Annotation> {
        let sel = self.selected.as_ref()?;
        self.result(&sel.analysis_type_id)?
            .find_annotation(&sel.annotation_id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Parsed description fields of the selected annotation.
    pub fn selected_fields(&self, cache: &ParseCache) -> Option<Arc<Vec<LabeledField>>> {
        self.selected().map(|a| cache.fields(&a.description))
    }

    // --- counts ---

    /// Counts across all results, hidden ones included.
    pub fn totals(&self) -> AnnotationCounts {
        self.results
            .iter()
            .map(AnalysisResult::counts)
            .fold(AnnotationCounts::default(), |acc, c| acc + c)
    }

    fn selection_belongs_to(&self, analysis_type_id: &str) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|s| s.analysis_type_id == analysis_type_id)
    }
}
