//! End-to-End Tests
//!
//! Drive a stack through the facade and paint its frames with Skia.

use nebula::skia::{render_png, render_surface};
use nebula::{
    parse_color_list, parse_vertex_counts, Argb, Effect, FixedTicks, LayerStack, NebulaConfig,
    Padding, Ticker,
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// Host attribute strings feed straight into a running stack.
#[test]
fn host_strings_configure_a_stack() {
    let fills = parse_color_list("#ff0000, 80808080").unwrap();
    assert_eq!(fills, vec![Argb(0xFFFF_0000), Argb(0x8080_8080)]);
    let counts = parse_vertex_counts("3, 5,7").unwrap();

    let mut stack = LayerStack::with_seed(NebulaConfig::default(), 1).unwrap();
    assert_eq!(stack.set_fill_colors(fills), Effect::Refresh);
    assert_eq!(stack.set_vertices_count(counts).unwrap(), Effect::Rebuild);

    let counts: Vec<usize> = stack.layers().iter().map(|l| l.vertex_count()).collect();
    assert_eq!(counts, vec![3, 5, 7]);
    let fills: Vec<Argb> = stack.layers().iter().map(|l| l.fill_color()).collect();
    assert_eq!(
        fills,
        vec![Argb(0xFFFF_0000), Argb(0x8080_8080), Argb(0x8080_8080)]
    );
}

#[test]
fn circle_stays_a_circle_across_rendered_frames() {
    let config = NebulaConfig {
        min_radius: 100.0,
        max_radius: 100.0,
        layers_count: 1,
        vertices_count: vec![4],
        ..NebulaConfig::default()
    };
    let mut stack = LayerStack::with_seed(config, 2).unwrap();

    let mut sizes = Vec::new();
    Ticker::new(FixedTicks::new(5)).run(&mut stack, |stack| {
        let center = stack.center();
        for vertex in stack.layers()[0].ring() {
            assert_close(vertex.point.distance(center), 100.0);
        }
        let surface = render_surface(&stack.frame()).unwrap();
        sizes.push((surface.width(), surface.height()));
    });
    assert_eq!(sizes, vec![(200, 200); 5]);
}

#[test]
fn padding_grows_the_canvas() {
    let mut stack = LayerStack::with_seed(
        NebulaConfig {
            max_radius: 50.0,
            min_radius: 40.0,
            ..NebulaConfig::default()
        },
        3,
    )
    .unwrap();
    stack.set_padding(Padding {
        left: 5.0,
        top: 10.0,
        right: 15.0,
        bottom: 20.0,
    });

    let frame = stack.frame();
    let surface = render_surface(&frame).unwrap();
    assert_eq!((surface.width(), surface.height()), (120, 130));
    assert!(!render_png(&frame).unwrap().is_empty());
}

#[test]
fn config_round_trips_through_json() {
    let config = NebulaConfig {
        fill_colors: vec![Argb(0x40FF_8800)],
        seed: Some(4),
        ..NebulaConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"#40FF8800\""));
    let parsed: NebulaConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}
