//! Confinement geometry: which part of an area the cursor may roam, how a
//! stray cursor is pulled back, and which area a re-trap click lands in.

use crate::types::{Area, AreaId, Point, RegionKind};

/// Inward padding applied when warping the cursor back inside.
pub const DEFAULT_PAD: i32 = 4;

/// Inclusive limits the cursor is held within while trapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl TrapBounds {
    /// Area bounds without the header strip (top), footer strip (bottom) and
    /// sidebar (right). Other region kinds overlay the text and stay inside.
    pub fn for_area(area: &Area) -> Self {
        let mut bounds = TrapBounds {
            min_x: area.rect.x,
            max_x: area.rect.right(),
            min_y: area.rect.y,
            max_y: area.rect.top(),
        };

        for region in &area.regions {
            match region.kind {
                RegionKind::Header => bounds.max_y -= region.rect.height,
                RegionKind::Footer => bounds.min_y += region.rect.height,
                RegionKind::Sidebar => bounds.max_x -= region.rect.width,
                RegionKind::Window | RegionKind::Other => {}
            }
        }

        bounds
    }

    /// True when the regions eat the whole area.
    pub fn is_empty(&self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.min_x..=self.max_x).contains(&point.x) && (self.min_y..=self.max_y).contains(&point.y)
    }

    /// Returns where the cursor has to be warped, or `None` when it is already
    /// inside.
    ///
    /// Each violated axis moves to its edge plus `pad`; an axis that is in
    /// range keeps its coordinate. Targets never pass the opposite edge, so a
    /// sliver narrower than twice the padding still settles. A negative `pad`
    /// counts as zero.
    pub fn clamp(&self, cursor: Point, pad: i32) -> Option<Point> {
        if self.is_empty() {
            return None;
        }

        let pad = pad.max(0);

        let x = clamp_axis(cursor.x, self.min_x, self.max_x, pad);
        let y = clamp_axis(cursor.y, self.min_y, self.max_y, pad);
        let target = Point::new(x, y);
        (target != cursor).then_some(target)
    }
}

fn clamp_axis(value: i32, min: i32, max: i32, pad: i32) -> i32 {
    if value < min {
        min.saturating_add(pad).min(max)
    } else if value > max {
        max.saturating_sub(pad).max(min)
    } else {
        value
    }
}

/// Finds the eligible area a click at `cursor` should re-trap into.
///
/// The first eligible area containing the cursor decides. The click must be
/// below its header (where the toggle button lives); an area without a
/// header never takes the trap.
pub fn locate_retrap_area(areas: &[Area], cursor: Point) -> Option<AreaId> {
    let area = areas
        .iter()
        .filter(|area| area.is_eligible())
        .find(|area| area.rect.contains(cursor))?;

    let header = area.region(RegionKind::Header)?;
    (!header.rect.contains(cursor)).then_some(area.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AreaKind, Rect, Region};

    fn text_area(id: u32, rect: Rect) -> Area {
        let header = Rect::new(rect.x, rect.top() - 26, rect.width, 26);
        let footer = Rect::new(rect.x, rect.y, rect.width, 20);
        let sidebar = Rect::new(rect.right() - 200, rect.y, 200, rect.height);
        Area {
            id: AreaId(id),
            kind: AreaKind::TextEditor,
            rect,
            regions: vec![
                Region {
                    kind: RegionKind::Header,
                    rect: header,
                },
                Region {
                    kind: RegionKind::Footer,
                    rect: footer,
                },
                Region {
                    kind: RegionKind::Sidebar,
                    rect: sidebar,
                },
                Region {
                    kind: RegionKind::Window,
                    rect,
                },
            ],
        }
    }

    #[test]
    fn bounds_subtract_header_footer_and_sidebar() {
        let area = text_area(1, Rect::new(100, 50, 800, 600));
        let bounds = TrapBounds::for_area(&area);
        assert_eq!(
            bounds,
            TrapBounds {
                min_x: 100,
                max_x: 700,
                min_y: 70,
                max_y: 624,
            }
        );
    }

    #[test]
    fn bounds_without_regions_match_area() {
        let area = Area {
            id: AreaId(1),
            kind: AreaKind::Console,
            rect: Rect::new(0, 0, 300, 200),
            regions: vec![],
        };
        let bounds = TrapBounds::for_area(&area);
        assert_eq!((bounds.min_x, bounds.max_x), (0, 300));
        assert_eq!((bounds.min_y, bounds.max_y), (0, 200));
    }

    #[test]
    fn clamp_moves_only_the_violated_axis() {
        let bounds = TrapBounds::for_area(&text_area(1, Rect::new(100, 50, 800, 600)));

        assert_eq!(
            bounds.clamp(Point::new(20, 300), DEFAULT_PAD),
            Some(Point::new(104, 300))
        );
        assert_eq!(
            bounds.clamp(Point::new(750, 300), DEFAULT_PAD),
            Some(Point::new(696, 300))
        );
        assert_eq!(
            bounds.clamp(Point::new(400, 60), DEFAULT_PAD),
            Some(Point::new(400, 74))
        );
        assert_eq!(
            bounds.clamp(Point::new(400, 640), DEFAULT_PAD),
            Some(Point::new(400, 620))
        );
    }

    #[test]
    fn clamp_corrects_both_axes_in_a_corner() {
        let bounds = TrapBounds::for_area(&text_area(1, Rect::new(100, 50, 800, 600)));
        assert_eq!(
            bounds.clamp(Point::new(10, 900), DEFAULT_PAD),
            Some(Point::new(104, 620))
        );
    }

    #[test]
    fn clamp_is_idempotent_inside_bounds() {
        let bounds = TrapBounds::for_area(&text_area(1, Rect::new(100, 50, 800, 600)));
        for point in [
            Point::new(100, 70),
            Point::new(700, 624),
            Point::new(400, 300),
            Point::new(104, 620),
        ] {
            assert_eq!(bounds.clamp(point, DEFAULT_PAD), None, "{point:?}");
        }

        let pulled = bounds
            .clamp(Point::new(-50, -50), DEFAULT_PAD)
            .expect("outside");
        assert_eq!(bounds.clamp(pulled, DEFAULT_PAD), None);
    }

    #[test]
    fn clamp_settles_in_narrow_bounds() {
        let bounds = TrapBounds {
            min_x: 0,
            max_x: 6,
            min_y: 0,
            max_y: 100,
        };
        let from_left = bounds.clamp(Point::new(-3, 50), DEFAULT_PAD).expect("left");
        let from_right = bounds.clamp(Point::new(9, 50), DEFAULT_PAD).expect("right");
        assert!(bounds.contains(from_left));
        assert!(bounds.contains(from_right));
        assert_eq!(bounds.clamp(from_left, DEFAULT_PAD), None);
        assert_eq!(bounds.clamp(from_right, DEFAULT_PAD), None);
    }

    #[test]
    fn clamp_ignores_collapsed_bounds() {
        let bounds = TrapBounds {
            min_x: 10,
            max_x: 10,
            min_y: 0,
            max_y: 100,
        };
        assert!(bounds.is_empty());
        assert_eq!(bounds.clamp(Point::new(500, 500), DEFAULT_PAD), None);
    }

    #[test]
    fn retrap_accepts_body_click() {
        let areas = vec![
            text_area(1, Rect::new(0, 0, 500, 400)),
            text_area(2, Rect::new(500, 0, 500, 400)),
        ];
        assert_eq!(
            locate_retrap_area(&areas, Point::new(700, 200)),
            Some(AreaId(2))
        );
    }

    #[test]
    fn retrap_rejects_header_click() {
        let areas = vec![text_area(1, Rect::new(0, 0, 500, 400))];
        assert_eq!(locate_retrap_area(&areas, Point::new(200, 390)), None);
    }

    #[test]
    fn retrap_skips_ineligible_areas() {
        let mut viewport = text_area(1, Rect::new(0, 0, 500, 400));
        viewport.kind = AreaKind::Viewport;
        assert_eq!(locate_retrap_area(&[viewport], Point::new(200, 200)), None);
    }

    #[test]
    fn retrap_requires_a_header() {
        let console = Area {
            id: AreaId(7),
            kind: AreaKind::Console,
            rect: Rect::new(0, 0, 300, 300),
            regions: vec![],
        };
        assert_eq!(locate_retrap_area(&[console], Point::new(150, 150)), None);
    }

    #[test]
    fn headerless_area_shadows_areas_behind_it() {
        let console = Area {
            id: AreaId(7),
            kind: AreaKind::Console,
            rect: Rect::new(0, 0, 300, 300),
            regions: vec![],
        };
        let editor = text_area(8, Rect::new(0, 0, 300, 300));
        assert_eq!(
            locate_retrap_area(&[console, editor], Point::new(150, 150)),
            None
        );
    }

    #[test]
    fn negative_pad_acts_as_zero() {
        let bounds = TrapBounds::for_area(&text_area(1, Rect::new(0, 0, 400, 300)));
        let target = bounds.clamp(Point::new(-20, 100), -10).expect("outside");
        assert_eq!(target, Point::new(0, 100));
        assert!(bounds.contains(target));
        assert_eq!(bounds.clamp(target, -10), None);
    }

    #[test]
    fn huge_pad_stays_within_bounds() {
        let bounds = TrapBounds {
            min_x: -100,
            max_x: 100,
            min_y: 10,
            max_y: 50,
        };
        let target = bounds
            .clamp(Point::new(i32::MIN, i32::MAX), i32::MAX)
            .expect("outside");
        assert_eq!(target, Point::new(100, 10));
        assert!(bounds.contains(target));
    }

    #[test]
    fn retrap_misses_outside_every_area() {
        let areas = vec![text_area(1, Rect::new(0, 0, 500, 400))];
        assert_eq!(locate_retrap_area(&areas, Point::new(900, 900)), None);
    }
}
