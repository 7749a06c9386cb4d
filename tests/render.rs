use speedview::{Color, DeluxeSpeedView, GaugeConfig, SectionStyle};

const DIAL: Color = Color::from_argb(0xff212121);
const GREEN: Color = Color::from_argb(0xff37872f);
const YELLOW: Color = Color::from_argb(0xffa38234);
const RED: Color = Color::from_argb(0xff9b2020);
const CIRCLE: Color = Color::from_argb(0xffe0e0e0);

fn rendered(width: usize, height: usize) -> (DeluxeSpeedView, speedview::Bitmap) {
    let mut view = DeluxeSpeedView::new();
    view.set_size(width, height);
    let frame = view.render();
    (view, frame)
}

#[test]
fn sections_cover_the_ring_in_order() {
    // 400 px, 30 px ring centered on radius 185
    let (_, frame) = rendered(400, 400);
    assert_eq!(frame.pixel(15, 200), Some(GREEN)); // 180 deg
    assert_eq!(frame.pixel(360, 107), Some(YELLOW)); // 330 deg
    assert_eq!(frame.pixel(360, 292), Some(RED)); // 30 deg
}

#[test]
fn dial_center_and_corners() {
    let (_, frame) = rendered(400, 400);
    assert_eq!(frame.pixel(200, 120), Some(DIAL));
    assert_eq!(frame.pixel(200, 200), Some(CIRCLE));
    assert_eq!(frame.pixel(0, 0), Some(Color::TRANSPARENT));
    assert_eq!(frame.pixel(399, 399), Some(Color::TRANSPARENT));
}

#[test]
fn gauge_is_centered_in_wide_views() {
    let (view, frame) = rendered(400, 300);
    assert_eq!(view.gauge().size(), 300);
    assert_eq!(frame.pixel(10, 150), Some(Color::TRANSPARENT));
    assert_eq!(frame.pixel(200, 150), Some(CIRCLE));
    assert_eq!(view.gauge().background().map(|b| (b.width(), b.height())), Some((300, 300)));
}

#[test]
fn center_circle_changes_skip_the_background() {
    let (mut view, _) = rendered(200, 200);
    let generation = view.gauge().background_generation();
    view.set_center_circle_color(Color::new(0, 0, 0xff));
    let frame = view.render();
    assert_eq!(view.gauge().background_generation(), generation);
    assert_eq!(frame.pixel(100, 100), Some(Color::new(0, 0, 0xff)));
}

#[test]
fn style_changes_rebuild_once() {
    let (mut view, _) = rendered(200, 200);
    let generation = view.gauge().background_generation();
    view.gauge_mut().set_sections_style(SectionStyle::Round);
    view.set_with_effects(false);
    view.render();
    view.render();
    assert_eq!(view.gauge().background_generation(), generation + 1);
}

#[test]
fn custom_config_renders_its_colors() {
    let config = GaugeConfig::builder()
        .background_circle_color(Color::new(0x10, 0x20, 0x30))
        .build();
    let mut view = DeluxeSpeedView::with_config(config).unwrap();
    view.set_size(400, 400);
    let frame = view.render();
    assert_eq!(frame.pixel(200, 120), Some(Color::new(0x10, 0x20, 0x30)));
}

#[test]
fn rejected_sections_keep_the_ring_within_range() {
    use speedview::Section;

    let (mut view, _) = rendered(400, 400);
    let overlapping = vec![
        Section::new(0.7, GREEN, SectionStyle::Butt),
        Section::new(0.7, RED, SectionStyle::Butt),
    ];
    assert!(view.gauge_mut().set_sections(overlapping).is_err());
    view.render();
    let last = view.section_arcs().last().map(|arc| arc.end());
    assert!(last.is_some_and(|end| (end - 405.0).abs() < 1e-3));
}
