//! `shift`, `focus` and `settings` commands.

use swimmap_core::{AppConfig, LatLng, ViewConfig};
use swimmap_viewport::{
    compute_shift, focus_on, is_negligible_shift, max_shift_for_viewport, MapSurface, MercatorMap,
    ScreenPoint, ScreenRect, ScreenSize,
};

/// Parse `LEFT,TOP,WIDTH,HEIGHT`.
pub(crate) fn parse_rect(raw: &str) -> Result<ScreenRect, String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let &[left, top, width, height] = parts.as_slice() else {
        return Err(format!("expected LEFT,TOP,WIDTH,HEIGHT, got '{raw}'"));
    };
    let num = |s: &str| {
        s.parse::<f64>()
            .map_err(|e| format!("invalid number '{s}': {e}"))
    };
    Ok(ScreenRect::new(num(left)?, num(top)?, num(width)?, num(height)?))
}

pub(crate) fn run_shift(
    view: &ViewConfig,
    viewport: ScreenRect,
    popup: ScreenRect,
    margin: Option<f64>,
    max_x: Option<f64>,
    max_y: Option<f64>,
) {
    let margin = margin.unwrap_or_else(|| view.popup_margin());
    let default_max = max_shift_for_viewport(viewport.size());
    let max_shift = ScreenPoint::new(
        max_x.unwrap_or(default_max.x),
        max_y.unwrap_or(default_max.y),
    );
    let shift = compute_shift(&viewport, &popup, margin, max_shift);
    println!("shift: x={:.1} y={:.1}", shift.x, shift.y);
    if is_negligible_shift(shift) {
        println!("popup already fits; no pan needed");
    } else {
        println!(
            "pan view by ({:.1}, {:.1}); popup moves by ({:.1}, {:.1})",
            shift.x, shift.y, -shift.x, -shift.y
        );
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FocusArgs {
    pub lat: f64,
    pub lng: f64,
    pub zoom: Option<f64>,
    pub anchor_x: Option<f64>,
    pub anchor_y: Option<f64>,
    pub width: f64,
    pub height: f64,
}

/// Focus a headless map on the target and report where it lands.
///
/// # Errors
///
/// Returns an error when the viewport has no area.
pub(crate) fn run_focus(mut view: ViewConfig, args: FocusArgs) -> anyhow::Result<()> {
    if let Some(x) = args.anchor_x {
        view.set_anchor_x(x);
    }
    if let Some(y) = args.anchor_y {
        view.set_anchor_y(y);
    }
    let target = LatLng::new(args.lat, args.lng);
    let mut map = MercatorMap::new(
        view.default_center(),
        view.default_zoom(),
        ScreenSize::new(args.width, args.height),
    );
    let request = focus_on(
        &mut map,
        target,
        view.anchor(),
        args.zoom,
        view.min_selection_zoom(),
    )?;
    let landed = map.screen_position(target);
    println!("center: {} zoom: {:.1}", request.center, map.zoom());
    println!(
        "target lands at ({:.1}, {:.1}) for anchor ({:.2}, {:.2})",
        landed.x,
        landed.y,
        view.anchor().x,
        view.anchor().y
    );
    Ok(())
}

pub(crate) fn run_settings(config: &AppConfig, view: &ViewConfig) {
    println!("environment:        {}", config.env);
    println!("view settings file: {}", config.view_config_path.display());
    println!("facilities file:    {}", config.facilities_path.display());
    println!("{}", view.summary());
    println!("popup margin:       {:.0}", view.popup_margin());
    println!("popup auto-adjust:  {}", view.popup_auto_adjust());
    println!("min selection zoom: {:.1}", view.min_selection_zoom());
    println!("popup settle:       {} ms", view.popup_settle().as_millis());
    println!("popup recheck:      {} ms", view.popup_recheck().as_millis());
    println!("scroll duration:    {} ms", view.scroll_duration().as_millis());
    println!("default center:     {}", view.default_center());
    println!("default zoom:       {:.1}", view.default_zoom());
}
