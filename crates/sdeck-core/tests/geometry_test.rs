//! Integration tests for the transform formatter.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sdeck_core::geometry::{Transform3d, Vec3, camera_pan, camera_zoom, step_placement};

#[test]
fn step_placement_composes_all_layers() {
    let t = Transform3d {
        translate: Vec3::new(2000.0, 4000.0, 0.0),
        rotate: Vec3::new(0.0, 0.0, 90.0),
        scale: 2.0,
    };
    assert_eq!(
        step_placement(&t),
        "translate(-50%, -50%) translate3d(2000px, 4000px, 0px) \
         rotateX(0deg) rotateY(0deg) rotateZ(90deg) scale(2)"
    );
}

#[test]
fn camera_layers_undo_rotation_in_reverse() {
    let t = Transform3d {
        translate: Vec3::new(100.0, 0.0, 0.0),
        rotate: Vec3::new(10.0, 20.0, 30.0),
        scale: 0.5,
    };
    let cam = t.inverse();
    assert_eq!(
        camera_pan(&cam),
        "rotateZ(-30deg) rotateY(-20deg) rotateX(-10deg) translate3d(-100px, 0px, 0px)"
    );
    assert_eq!(camera_zoom(&cam), "scale(2)");
}

proptest! {
    #[test]
    fn double_inverse_restores_translation_and_rotation(
        x in -1e6f64..1e6, y in -1e6f64..1e6, z in -1e6f64..1e6,
        rx in -360f64..360.0, ry in -360f64..360.0, rz in -360f64..360.0,
        s in 0.01f64..100.0,
    ) {
        let t = Transform3d {
            translate: Vec3::new(x, y, z),
            rotate: Vec3::new(rx, ry, rz),
            scale: s,
        };
        let back = t.inverse().inverse();
        prop_assert_eq!(back.translate, t.translate);
        prop_assert_eq!(back.rotate, t.rotate);
        prop_assert!((back.scale - s).abs() <= s * 1e-12);
    }

    #[test]
    fn formatted_expressions_never_contain_negative_zero(
        x in prop_oneof![Just(0.0f64), Just(-0.0f64), -10.0f64..10.0],
    ) {
        let out = step_placement(&Transform3d {
            translate: Vec3::new(x, -x, 0.0),
            rotate: Vec3::new(-x, x, -0.0),
            scale: 1.0,
        });
        prop_assert!(!out.contains("-0px") && !out.contains("-0deg"), "{}", out);
    }
}
