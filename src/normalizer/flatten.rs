//! Stage 1: flatten the spread hierarchy into the object pool.

use super::pool::{ContentType, FlatObject, InlineAnchor, ObjectPool};
use crate::geometry::{self, Bounds, Transform};
use crate::idml::{Group, IdmlDocument, Page, Spread};

/// Flatten every placed object of every spread into a pool.
///
/// Objects enter the pool in paint order: text frames, image frames, vector
/// shapes, then groups, spread by spread. A single z-order counter spans the
/// whole document, so z values are strictly increasing across pages.
/// Objects without bounds or a transform cannot be placed and are skipped.
pub fn flatten(document: &IdmlDocument) -> ObjectPool {
    let mut pool = ObjectPool::new();
    let mut z_order: u32 = 0;

    for spread in &document.spreads {
        for frame in &spread.text_frames {
            let Some((bounds, transform)) =
                placement(&frame.self_id, frame.geometric_bounds, frame.item_transform)
            else {
                continue;
            };
            z_order = push(
                &mut pool,
                z_order,
                FlatObject {
                    self_id: frame.self_id.clone(),
                    content_type: ContentType::TextFrame,
                    story_id: frame.parent_story_id.clone(),
                    bounds,
                    transform,
                    absolute_bbox: geometry::transformed_bounding_box(&bounds, &transform),
                    page_number: assign_page(document, spread, &bounds, &transform),
                    z_order,
                    inline: None,
                    from_group: frame.parent_group_id.is_some(),
                    parent_group_id: frame.parent_group_id.clone(),
                },
            );
        }

        for frame in &spread.image_frames {
            let Some((bounds, transform)) =
                placement(&frame.self_id, frame.geometric_bounds, frame.item_transform)
            else {
                continue;
            };
            z_order = push(
                &mut pool,
                z_order,
                FlatObject {
                    self_id: frame.self_id.clone(),
                    content_type: ContentType::ImageFrame,
                    story_id: None,
                    bounds,
                    transform,
                    absolute_bbox: geometry::transformed_bounding_box(&bounds, &transform),
                    page_number: assign_page(document, spread, &bounds, &transform),
                    z_order,
                    inline: None,
                    from_group: frame.from_group,
                    parent_group_id: None,
                },
            );
        }

        for shape in &spread.vector_shapes {
            let Some((bounds, transform)) =
                placement(&shape.self_id, shape.geometric_bounds, shape.item_transform)
            else {
                continue;
            };
            // Shapes referenced from a story run are pre-classified by the
            // loader and enter the pool already inline.
            let inline = shape.inline.then(|| InlineAnchor {
                story_id: shape.parent_story_id.clone(),
                char_offset: 0,
            });
            z_order = push(
                &mut pool,
                z_order,
                FlatObject {
                    self_id: shape.self_id.clone(),
                    content_type: ContentType::VectorShape,
                    story_id: None,
                    bounds,
                    transform,
                    absolute_bbox: geometry::transformed_bounding_box(&bounds, &transform),
                    page_number: assign_page(document, spread, &bounds, &transform),
                    z_order,
                    inline,
                    from_group: shape.from_group,
                    parent_group_id: None,
                },
            );
        }

        for group in &spread.groups {
            z_order = flatten_group(document, spread, group, None, z_order, &mut pool);
        }
    }

    log::debug!("flatten: {}", pool.summary());
    pool
}

/// Flatten a group and its nested child groups, threading the z counter.
fn flatten_group(
    document: &IdmlDocument,
    spread: &Spread,
    group: &Group,
    parent_group_id: Option<&str>,
    mut z_order: u32,
    pool: &mut ObjectPool,
) -> u32 {
    let Some((bounds, transform)) =
        placement(&group.self_id, group.geometric_bounds, group.item_transform)
    else {
        return z_order;
    };

    z_order = push(
        pool,
        z_order,
        FlatObject {
            self_id: group.self_id.clone(),
            content_type: ContentType::Group,
            story_id: None,
            bounds,
            transform,
            absolute_bbox: geometry::transformed_bounding_box(&bounds, &transform),
            page_number: assign_page(document, spread, &bounds, &transform),
            z_order,
            inline: None,
            from_group: parent_group_id.is_some(),
            parent_group_id: parent_group_id.map(str::to_string),
        },
    );

    for child in &group.child_groups {
        z_order = flatten_group(document, spread, child, Some(&group.self_id), z_order, pool);
    }
    z_order
}

fn push(pool: &mut ObjectPool, z_order: u32, object: FlatObject) -> u32 {
    if pool.insert(object) {
        z_order + 1
    } else {
        z_order
    }
}

/// Geometry required for placement, or `None` (with a debug log) when the
/// loader could not provide it.
fn placement(
    self_id: &str,
    bounds: Option<Bounds>,
    transform: Option<Transform>,
) -> Option<(Bounds, Transform)> {
    match (bounds, transform) {
        (Some(b), Some(t)) => Some((b, t)),
        (Some(b), None) => Some((b, geometry::IDENTITY)),
        _ => {
            log::debug!("skipping object without bounds: {}", self_id);
            None
        }
    }
}

/// Find the page an object belongs to.
///
/// The first page whose transformed area contains the object's transformed
/// center wins; objects pasteboard-adjacent to every page fall back to the
/// spread's first page, then to the document's starting page number.
fn assign_page(
    document: &IdmlDocument,
    spread: &Spread,
    bounds: &Bounds,
    transform: &Transform,
) -> u32 {
    for page in &spread.pages {
        if page_contains(page, bounds, transform) {
            return page.page_number;
        }
    }
    spread
        .pages
        .first()
        .map(|p| p.page_number)
        .unwrap_or(document.page_number_start)
}

fn page_contains(page: &Page, bounds: &Bounds, transform: &Transform) -> bool {
    let (Some(page_bounds), Some(page_transform)) = (page.geometric_bounds, page.item_transform)
    else {
        return false;
    };
    geometry::contains_center(bounds, transform, &page_bounds, &page_transform)
}
