//! Drives the selection → focus → settle → popup → collision flow against
//! recording fakes and the headless Mercator surface.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use swimmap_core::{LatLng, ViewConfig, ViewKnob};
use swimmap_viewport::{
    MapRequest, MapSurface, MarkerHandle, MercatorMap, Registry, RowHandle, RowLayout, ScreenPoint,
    ScreenRect, ScreenSize, ScrollContainer, SelectOptions, SelectionCoordinator, SelectionState,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Event {
    MarkerSelected(usize, bool),
    MarkerHighlighted(usize, bool),
    PopupOpened(usize),
    PopupClosed(usize),
    RowSelected(usize, bool),
    RowHighlighted(usize, bool),
}

type Log = Rc<RefCell<Vec<Event>>>;

struct FakeMarker {
    index: usize,
    position: LatLng,
    log: Log,
    selected: bool,
    open: bool,
    bounds: Rc<Cell<Option<ScreenRect>>>,
}

impl MarkerHandle for FakeMarker {
    fn position(&self) -> LatLng {
        self.position
    }

    fn set_highlighted(&mut self, highlighted: bool) {
        self.log
            .borrow_mut()
            .push(Event::MarkerHighlighted(self.index, highlighted));
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
        self.log
            .borrow_mut()
            .push(Event::MarkerSelected(self.index, selected));
    }

    fn open_popup(&mut self) {
        self.open = true;
        self.log.borrow_mut().push(Event::PopupOpened(self.index));
    }

    fn close_popup(&mut self) {
        self.open = false;
        self.log.borrow_mut().push(Event::PopupClosed(self.index));
    }

    fn popup_bounds(&self) -> Option<ScreenRect> {
        if self.open {
            self.bounds.get()
        } else {
            None
        }
    }
}

struct FakeRow {
    index: usize,
    log: Log,
    selected: bool,
}

impl RowHandle for FakeRow {
    fn layout(&self) -> RowLayout {
        RowLayout {
            top: (self.index as f64 - 1.0) * 100.0,
            height: 80.0,
        }
    }

    fn set_highlighted(&mut self, highlighted: bool) {
        self.log
            .borrow_mut()
            .push(Event::RowHighlighted(self.index, highlighted));
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
        self.log
            .borrow_mut()
            .push(Event::RowSelected(self.index, selected));
    }
}

#[derive(Debug, Default)]
struct FakeList {
    top: f64,
}

impl ScrollContainer for FakeList {
    fn scroll_top(&self) -> f64 {
        self.top
    }

    fn set_scroll_top(&mut self, offset: f64) {
        self.top = offset;
    }

    fn client_height(&self) -> f64 {
        400.0
    }

    fn scroll_height(&self) -> f64 {
        2000.0
    }
}

type Coordinator = SelectionCoordinator<MercatorMap, FakeList, FakeMarker, FakeRow>;

struct Harness {
    coordinator: Coordinator,
    log: Log,
    popups: Vec<PopupBounds>,
}

fn facility_position(index: usize) -> LatLng {
    let step = index as f64 * 0.01;
    LatLng::new(37.50 + step, 127.00 + step)
}

type PopupBounds = Rc<Cell<Option<ScreenRect>>>;

fn registry(
    log: &Log,
    markers: usize,
    rows: usize,
) -> (Registry<FakeMarker, FakeRow>, Vec<PopupBounds>) {
    let popups: Vec<_> = (0..markers)
        .map(|_| Rc::new(Cell::new(Some(ScreenRect::new(300.0, 200.0, 200.0, 100.0)))))
        .collect();
    let markers = (1..=markers)
        .map(|index| FakeMarker {
            index,
            position: facility_position(index),
            log: Rc::clone(log),
            selected: false,
            open: false,
            bounds: Rc::clone(&popups[index - 1]),
        })
        .collect();
    let rows = (1..=rows)
        .map(|index| FakeRow {
            index,
            log: Rc::clone(log),
            selected: false,
        })
        .collect();
    (Registry::new(markers, rows), popups)
}

fn seoul_map() -> MercatorMap {
    MercatorMap::new(
        LatLng::new(37.5665, 126.9780),
        12.0,
        ScreenSize::new(1000.0, 600.0),
    )
}

fn harness(config: ViewConfig, count: usize) -> Harness {
    harness_on(seoul_map(), config, count)
}

fn harness_on(map: MercatorMap, config: ViewConfig, count: usize) -> Harness {
    let mut coordinator = SelectionCoordinator::new(map, FakeList::default(), config);
    let log: Log = Rc::default();
    let (registry, popups) = registry(&log, count, count);
    coordinator.replace_results(registry, None, Duration::ZERO);
    Harness {
        coordinator,
        log,
        popups,
    }
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn position_of(log: &[Event], event: Event) -> usize {
    log.iter()
        .position(|e| *e == event)
        .unwrap_or_else(|| panic!("missing {event:?} in {log:?}"))
}

fn pans(c: &Coordinator) -> Vec<ScreenPoint> {
    c.map()
        .requests()
        .iter()
        .filter_map(|r| match r {
            MapRequest::PanBy { delta, .. } => Some(*delta),
            MapRequest::SetCenter { .. } => None,
        })
        .collect()
}

fn popup_only() -> SelectOptions {
    SelectOptions {
        focus_map: false,
        open_popup: true,
        zoom: None,
    }
}

fn selected_markers(c: &Coordinator) -> Vec<usize> {
    (1..=c.registry().len())
        .filter(|&i| c.registry().marker(i).is_some_and(|m| m.selected))
        .collect()
}

fn selected_rows(c: &Coordinator) -> Vec<usize> {
    (1..=c.registry().len())
        .filter(|&i| c.registry().row(i).is_some_and(|r| r.selected))
        .collect()
}

#[test]
fn select_clears_previous_then_focuses_then_opens_popup_after_settle() {
    let mut h = harness(ViewConfig::default(), 5);
    h.coordinator.select(1, SelectOptions::marker_click(), ms(0));
    h.coordinator.tick(ms(300));
    h.log.borrow_mut().clear();

    let t = ms(1_000);
    h.coordinator.select(3, SelectOptions::marker_click(), t);

    {
        let log = h.log.borrow();
        let cleared_row = position_of(&log, Event::RowSelected(1, false));
        let cleared_marker = position_of(&log, Event::MarkerSelected(1, false));
        let set_row = position_of(&log, Event::RowSelected(3, true));
        let set_marker = position_of(&log, Event::MarkerSelected(3, true));
        assert!(cleared_row < set_row && cleared_row < set_marker);
        assert!(cleared_marker < set_row && cleared_marker < set_marker);
        assert!(log.contains(&Event::PopupClosed(1)));
        assert!(!log.contains(&Event::PopupOpened(3)));
    }

    assert_eq!(h.coordinator.state(), SelectionState::Selected(3));
    assert_eq!(selected_markers(&h.coordinator), vec![3]);
    assert_eq!(selected_rows(&h.coordinator), vec![3]);

    let map = h.coordinator.map();
    let pos = map.screen_position(facility_position(3));
    assert!((pos.x - 300.0).abs() < 1e-6, "x = {}", pos.x);
    assert!((pos.y - 300.0).abs() < 1e-6, "y = {}", pos.y);
    assert!((map.zoom() - 14.0).abs() < f64::EPSILON);

    h.coordinator.tick(t + ms(239));
    assert!(!h.log.borrow().contains(&Event::PopupOpened(3)));
    h.coordinator.tick(t + ms(240));
    assert!(h.log.borrow().contains(&Event::PopupOpened(3)));
}

#[test]
fn row_click_zooms_in_to_sixteen() {
    let mut h = harness(ViewConfig::default(), 3);
    h.coordinator.select(2, SelectOptions::row_click(), ms(0));
    assert!((h.coordinator.map().zoom() - 16.0).abs() < f64::EPSILON);
}

#[test]
fn exactly_one_pair_selected_across_many_selections() {
    let mut h = harness(ViewConfig::default(), 6);
    let sequence = [4, 1, 1, 6, 2, 5, 3, 3, 6];
    for (step, index) in sequence.into_iter().enumerate() {
        let now = ms(step as u64 * 50);
        h.coordinator.select(index, SelectOptions::marker_click(), now);
        h.coordinator.tick(now);
        assert_eq!(selected_markers(&h.coordinator), vec![index]);
        assert_eq!(selected_rows(&h.coordinator), vec![index]);
    }
}

#[test]
fn superseded_selection_never_opens_its_popup() {
    let mut h = harness(ViewConfig::default(), 5);
    h.coordinator.select(2, SelectOptions::marker_click(), ms(0));
    h.coordinator.select(4, SelectOptions::marker_click(), ms(100));
    h.coordinator.tick(ms(1_000));

    let log = h.log.borrow();
    assert!(!log.contains(&Event::PopupOpened(2)));
    assert!(log.contains(&Event::PopupOpened(4)));
}

#[test]
fn latest_quiet_selection_cancels_earlier_popup_for_same_index() {
    let mut h = harness(ViewConfig::default(), 5);
    let quiet = SelectOptions {
        focus_map: false,
        open_popup: false,
        zoom: None,
    };
    h.coordinator.select(2, SelectOptions::marker_click(), ms(0));
    h.coordinator.select(3, SelectOptions::marker_click(), ms(50));
    h.coordinator.select(2, quiet, ms(100));

    h.coordinator.tick(ms(1_000));
    let log = h.log.borrow();
    assert!(!log.contains(&Event::PopupOpened(2)));
    assert!(!log.contains(&Event::PopupOpened(3)));
    assert_eq!(h.coordinator.selected_index(), Some(2));
}

#[test]
fn zero_sized_map_skips_focus_and_opens_popup_at_once() {
    let mut h = harness(ViewConfig::default(), 3);
    h.coordinator.map_mut().resize(ScreenSize::new(0.0, 0.0));

    h.coordinator.select(2, SelectOptions::marker_click(), ms(0));
    assert!(h.log.borrow().contains(&Event::PopupOpened(2)));
    assert!(h
        .coordinator
        .map()
        .requests()
        .iter()
        .all(|r| !matches!(r, MapRequest::SetCenter { .. })));
    assert_eq!(h.coordinator.selected_index(), Some(2));
}

#[test]
fn popup_only_opens_immediately_without_focus() {
    let mut h = harness(ViewConfig::default(), 3);
    let options = SelectOptions {
        focus_map: false,
        open_popup: true,
        zoom: None,
    };
    h.coordinator.select(2, options, ms(0));
    assert!(h.log.borrow().contains(&Event::PopupOpened(2)));
    assert!(h.coordinator.map().requests().is_empty());
}

#[test]
fn hover_highlights_pair_but_not_the_selection() {
    let mut h = harness(ViewConfig::default(), 4);
    h.coordinator.select(2, SelectOptions::marker_click(), ms(0));
    h.log.borrow_mut().clear();

    h.coordinator.hover_enter(2);
    assert!(h.log.borrow().is_empty());

    h.coordinator.hover_enter(3);
    h.coordinator.hover_leave(3);
    assert_eq!(
        *h.log.borrow(),
        vec![
            Event::MarkerHighlighted(3, true),
            Event::RowHighlighted(3, true),
            Event::MarkerHighlighted(3, false),
            Event::RowHighlighted(3, false),
        ]
    );
    assert_eq!(h.coordinator.selected_index(), Some(2));
}

#[test]
fn collision_check_pans_popup_back_inside() {
    let mut config = ViewConfig::default();
    config.set_popup_auto_adjust(true);
    config.set_popup_margin(60.0);
    let mut h = harness(config, 3);
    h.popups[1].set(Some(ScreenRect::new(-40.0, 200.0, 200.0, 100.0)));

    h.coordinator.select(2, popup_only(), ms(0));
    h.coordinator.tick(ms(16));

    let pans: Vec<_> = h
        .coordinator
        .map()
        .requests()
        .iter()
        .filter_map(|r| match r {
            MapRequest::PanBy { delta, animate } => Some((*delta, *animate)),
            MapRequest::SetCenter { .. } => None,
        })
        .collect();
    assert_eq!(pans, vec![(ScreenPoint::new(-100.0, 0.0), true)]);

    // The pan moved the popup into place; the late recheck finds nothing.
    h.popups[1].set(Some(ScreenRect::new(60.0, 200.0, 200.0, 100.0)));
    h.coordinator.tick(ms(260));
    let pan_count = h
        .coordinator
        .map()
        .requests()
        .iter()
        .filter(|r| matches!(r, MapRequest::PanBy { .. }))
        .count();
    assert_eq!(pan_count, 1);
}

#[test]
fn collision_check_uses_container_offset_in_page() {
    let mut config = ViewConfig::default();
    config.set_popup_auto_adjust(true);
    config.set_popup_margin(60.0);
    let map = seoul_map().with_origin(ScreenPoint::new(200.0, 100.0));
    let mut h = harness_on(map, config, 3);
    // Inside a container at the page origin, but 100 px past the margin
    // of one that starts at x = 200.
    h.popups[0].set(Some(ScreenRect::new(160.0, 300.0, 200.0, 100.0)));

    h.coordinator.select(1, popup_only(), ms(0));
    h.coordinator.tick(ms(16));
    assert_eq!(pans(&h.coordinator), vec![ScreenPoint::new(-100.0, 0.0)]);
}

#[test]
fn enabling_auto_adjust_checks_the_open_popup() {
    let mut h = harness(ViewConfig::default(), 3);
    h.popups[1].set(Some(ScreenRect::new(-40.0, 200.0, 200.0, 100.0)));
    h.coordinator.select(2, popup_only(), ms(0));
    h.coordinator.tick(ms(300));
    assert!(pans(&h.coordinator).is_empty());

    assert!(h.coordinator.set_popup_auto_adjust(true, ms(400)));
    h.coordinator.tick(ms(400));
    // Default margin is 80: the popup sits 120 px past the left edge.
    assert_eq!(pans(&h.coordinator), vec![ScreenPoint::new(-120.0, 0.0)]);

    assert!(h.coordinator.apply_knob(ViewKnob::PopupAutoAdjust, "off", ms(500)));
    h.coordinator.tick(ms(500));
    assert_eq!(pans(&h.coordinator).len(), 1);

    assert!(h.coordinator.apply_knob(ViewKnob::PopupAutoAdjust, "on", ms(600)));
    h.coordinator.tick(ms(600));
    assert_eq!(pans(&h.coordinator).len(), 2);
}

#[test]
fn collision_check_is_off_by_default() {
    let mut h = harness(ViewConfig::default(), 3);
    h.popups[0].set(Some(ScreenRect::new(-400.0, -300.0, 200.0, 150.0)));
    h.coordinator.select(1, SelectOptions::marker_click(), ms(0));
    h.coordinator.tick(ms(240));
    h.coordinator.tick(ms(600));
    assert!(h
        .coordinator
        .map()
        .requests()
        .iter()
        .all(|r| matches!(r, MapRequest::SetCenter { .. })));
}

#[test]
fn list_scrolls_selected_row_to_middle() {
    let mut h = harness(ViewConfig::default(), 8);
    h.coordinator.select(5, SelectOptions::marker_click(), ms(0));
    assert!(h.coordinator.has_pending_work());
    h.coordinator.tick(ms(60));
    assert!(h.coordinator.list().top > 0.0 && h.coordinator.list().top < 240.0);
    h.coordinator.tick(ms(300));
    // Row 5 spans 400..480; its middle lands at 200 of a 400 px list.
    assert!((h.coordinator.list().top - 240.0).abs() < 1e-9);
}

#[test]
fn replace_results_clears_selection_and_can_auto_select() {
    let mut h = harness(ViewConfig::default(), 4);
    h.coordinator.select(2, SelectOptions::marker_click(), ms(0));

    let (fresh, _) = registry(&h.log, 3, 3);
    h.coordinator.replace_results(fresh, None, ms(10));
    assert_eq!(h.coordinator.state(), SelectionState::NoneSelected);
    assert!(selected_markers(&h.coordinator).is_empty());
    h.coordinator.tick(ms(1_000));
    assert!(!h.log.borrow().contains(&Event::PopupOpened(2)));

    let (fresh, _) = registry(&h.log, 3, 3);
    h.coordinator
        .replace_results(fresh, Some(SelectOptions::marker_click()), ms(2_000));
    assert_eq!(h.coordinator.selected_index(), Some(1));
    assert_eq!(selected_markers(&h.coordinator), vec![1]);
    h.coordinator.tick(ms(2_240));
    assert!(h.log.borrow().contains(&Event::PopupOpened(1)));
}

#[test]
fn missing_row_leaves_marker_side_working() {
    let mut coordinator: Coordinator =
        SelectionCoordinator::new(seoul_map(), FakeList::default(), ViewConfig::default());
    let log: Log = Rc::default();
    let (reg, _) = registry(&log, 3, 2);
    coordinator.replace_results(reg, None, ms(0));

    coordinator.select(3, SelectOptions::marker_click(), ms(0));
    assert_eq!(coordinator.selected_index(), Some(3));
    assert_eq!(selected_markers(&coordinator), vec![3]);
    assert!(selected_rows(&coordinator).is_empty());
    assert!(!coordinator.map().requests().is_empty());

    coordinator.select(9, SelectOptions::marker_click(), ms(10));
    assert_eq!(coordinator.selected_index(), Some(9));
    assert!(selected_markers(&coordinator).is_empty());
}

#[test]
fn anchor_change_recenters_current_selection() {
    let mut h = harness(ViewConfig::default(), 3);
    h.coordinator.select(2, SelectOptions::marker_click(), ms(0));
    h.coordinator.tick(ms(240));

    let effective = h.coordinator.set_anchor_x(0.7, ms(500));
    assert!((effective - 0.7).abs() < f64::EPSILON);
    let pos = h.coordinator.map().screen_position(facility_position(2));
    assert!((pos.x - 700.0).abs() < 1e-6, "x = {}", pos.x);

    assert!((h.coordinator.set_anchor_y(5.0, ms(600)) - 0.95).abs() < f64::EPSILON);
}

#[test]
fn rejected_or_unchanged_anchor_does_not_recenter() {
    let mut h = harness(ViewConfig::default(), 3);
    h.coordinator.select(2, SelectOptions::marker_click(), ms(0));
    h.coordinator.tick(ms(240));
    let requests = h.coordinator.map().requests().len();
    h.log.borrow_mut().clear();

    assert!((h.coordinator.set_anchor_x(f64::NAN, ms(300)) - 0.3).abs() < f64::EPSILON);
    assert!((h.coordinator.set_anchor_y(f64::INFINITY, ms(300)) - 0.5).abs() < f64::EPSILON);
    assert!(h.coordinator.apply_knob(ViewKnob::AnchorX, "0.3", ms(300)));
    assert!(!h.coordinator.apply_knob(ViewKnob::AnchorY, "NaN", ms(300)));

    h.coordinator.tick(ms(1_000));
    assert_eq!(h.coordinator.map().requests().len(), requests);
    assert!(h.log.borrow().is_empty());
}

#[test]
fn console_knobs_reject_bad_text() {
    let mut h = harness(ViewConfig::default(), 3);
    h.coordinator.select(1, SelectOptions::marker_click(), ms(0));
    let before = h.coordinator.map().requests().len();

    assert!(!h.coordinator.apply_knob(ViewKnob::AnchorY, "abc", ms(10)));
    assert_eq!(h.coordinator.map().requests().len(), before);

    assert!(h.coordinator.apply_knob(ViewKnob::ScrollBias, "0.9", ms(20)));
    assert!((h.coordinator.config().scroll_bias() - 0.45).abs() < f64::EPSILON);

    assert!(h.coordinator.apply_knob(ViewKnob::AnchorX, "0.5", ms(30)));
    assert_eq!(h.coordinator.map().requests().len(), before + 1);
    assert_eq!(
        h.coordinator.config().summary(),
        "Viewport=(0.50, 0.50), ListPos=0.45"
    );
    h.coordinator.log_focus_settings();
}
