//! Distribution of story text across linked text frames.
//!
//! A story flows through a chain of linked frames, but the source document
//! records only the full text and the chain topology, never which
//! characters land in which frame. This module estimates the split by
//! character count: frame capacity from frame size and font metrics, greedy
//! assignment in chain order, cut points nudged to the nearest newline or
//! whitespace. It is an approximation, not a layout pass; exact line breaks
//! are the emitter's problem.

use crate::idml::{link_target, IdmlDocument, Story, TextFrame};
use std::collections::HashSet;

/// How far (in characters) a cut point may move to find a better break.
const CUT_SEARCH_WINDOW: usize = 20;

/// Average glyph width as a fraction of the font size.
const GLYPH_WIDTH_RATIO: f64 = 0.9;

/// Size of one frame in a chain, for capacity estimation.
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo {
    /// Usable width (points)
    pub width: f64,

    /// Usable height (points)
    pub height: f64,
}

impl FrameInfo {
    /// Create frame info from a width and height in points.
    pub fn from_points(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Estimate how many characters fit in this frame.
    ///
    /// Characters per line from the width and an average glyph width of
    /// 0.9 em; line count from the height and the line spacing ratio.
    /// Never less than 1, so every frame in a chain receives some text.
    pub fn estimate_capacity(&self, font_size: f64, line_spacing_ratio: f64) -> usize {
        let glyph_width = font_size * GLYPH_WIDTH_RATIO;
        let line_height = font_size * line_spacing_ratio;
        if glyph_width <= 0.0 || line_height <= 0.0 {
            return 1;
        }
        let chars_per_line = (self.width / glyph_width).floor().max(0.0) as usize;
        let lines = (self.height / line_height).floor().max(0.0) as usize;
        (chars_per_line * lines).max(1)
    }
}

/// Split text across a chain of frames.
///
/// Greedy in chain order: each frame takes up to its estimated capacity,
/// the last frame absorbs whatever remains. When the text exceeds the total
/// capacity, per-frame capacities are scaled up proportionally so the
/// overflow spreads across the chain instead of piling into the last frame.
/// Cut points are moved to the nearest newline (preferred) or whitespace
/// within a small window. Concatenating the returned pieces always
/// reproduces the input text.
pub fn fit_text(
    full_text: &str,
    frames: &[FrameInfo],
    font_size: f64,
    line_spacing_ratio: f64,
) -> Vec<String> {
    if frames.is_empty() {
        return Vec::new();
    }
    if frames.len() == 1 || full_text.is_empty() {
        let mut pieces = vec![String::new(); frames.len()];
        pieces[0] = full_text.to_string();
        return pieces;
    }

    let chars: Vec<char> = full_text.chars().collect();
    let mut capacities: Vec<usize> = frames
        .iter()
        .map(|f| f.estimate_capacity(font_size, line_spacing_ratio))
        .collect();

    let total: usize = capacities.iter().sum();
    if chars.len() > total && total > 0 {
        let scale = chars.len() as f64 / total as f64;
        for cap in &mut capacities {
            *cap = ((*cap as f64) * scale).ceil() as usize;
        }
    }

    let mut pieces = Vec::with_capacity(frames.len());
    let mut start = 0usize;
    for (i, cap) in capacities.iter().enumerate() {
        if i == capacities.len() - 1 {
            pieces.push(chars[start..].iter().collect());
            break;
        }
        let target = (start + cap).min(chars.len());
        let cut = find_cut_point(&chars, start, target);
        pieces.push(chars[start..cut].iter().collect());
        start = cut;
    }
    pieces
}

/// Find the best cut position at or near `target` (char indices).
///
/// Prefers the newline closest to the target within the search window,
/// then the closest whitespace; cuts fall after the break character so it
/// stays with the earlier piece. Falls back to the target itself.
fn find_cut_point(chars: &[char], start: usize, target: usize) -> usize {
    if target >= chars.len() {
        return chars.len();
    }
    let window_start = target.saturating_sub(CUT_SEARCH_WINDOW).max(start);
    let window_end = (target + CUT_SEARCH_WINDOW).min(chars.len());

    let mut best_newline: Option<usize> = None;
    let mut best_space: Option<usize> = None;
    for i in window_start..window_end {
        let distance = target.abs_diff(i);
        if chars[i] == '\n' {
            if best_newline.map_or(true, |b| distance < target.abs_diff(b)) {
                best_newline = Some(i);
            }
        } else if chars[i].is_whitespace()
            && best_space.map_or(true, |b| distance < target.abs_diff(b))
        {
            best_space = Some(i);
        }
    }

    match best_newline.or(best_space) {
        Some(i) if i + 1 > start => i + 1,
        _ => target,
    }
}

/// Collect a frame chain starting at its head, following `next` links.
///
/// Links may cross spreads; a repeated id (a cycle in malformed input)
/// ends the walk.
pub fn collect_chain<'a>(document: &'a IdmlDocument, head_id: &str) -> Vec<&'a TextFrame> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(head_id.to_string());

    while let Some(id) = current {
        if !seen.insert(id.clone()) {
            log::warn!("cycle in linked frame chain at {id}");
            break;
        }
        let Some(frame) = document.find_text_frame(&id) else {
            break;
        };
        chain.push(frame);
        current = link_target(frame.next_text_frame.as_deref()).map(str::to_string);
    }
    chain
}

/// The story's text as a plain string: run contents concatenated, one
/// newline per paragraph boundary, outer whitespace trimmed.
pub fn story_plain_text(story: &Story) -> String {
    story
        .paragraphs
        .iter()
        .map(|p| {
            p.runs
                .iter()
                .filter_map(|r| r.content.as_deref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Distribute a story across its frame chain.
///
/// Returns `(frame id, text piece)` in chain order; empty when the head
/// frame does not exist.
pub fn distribute_story(
    document: &IdmlDocument,
    story: &Story,
    head_id: &str,
    font_size: f64,
    line_spacing_ratio: f64,
) -> Vec<(String, String)> {
    let chain = collect_chain(document, head_id);
    if chain.is_empty() {
        return Vec::new();
    }

    let infos: Vec<FrameInfo> = chain
        .iter()
        .map(|f| FrameInfo::from_points(f.width_points(), f.height_points()))
        .collect();
    let text = story_plain_text(story);
    let pieces = fit_text(&text, &infos, font_size, line_spacing_ratio);

    chain
        .iter()
        .zip(pieces)
        .map(|(frame, piece)| (frame.self_id.clone(), piece))
        .collect()
}
