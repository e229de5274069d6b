mod common;

use std::sync::atomic::Ordering;
use std::thread;

use common::*;

fn sample_images() -> Vec<image::DynamicImage> {
    vec![
        image_with_rects(200, 100, &[(40, 30, 119, 49)]),
        image_with_rects(160, 120, &[(10, 10, 69, 29), (10, 70, 99, 89)]),
        gray_image_with_rects(96, 64, &[(20, 20, 75, 43)]),
        image_with_rects(1200, 400, &[(100, 100, 899, 199)]),
    ]
}

#[test]
fn test_cloned_detectors_run_in_parallel() -> anyhow::Result<()> {
    let engine = BrightPixelEngine::new(0.9);
    let runs = engine.runs.clone();
    let original = TextDetector::new(Box::new(engine));
    let images = sample_images();

    let baseline = images
        .iter()
        .map(|img| original.detect(img))
        .collect::<Result<Vec<_>, _>>()?;

    let clones = (0..3)
        .map(|_| original.try_clone())
        .collect::<Result<Vec<_>, _>>()?;

    thread::scope(|s| {
        for detector in std::iter::once(&original).chain(clones.iter()) {
            let (images, baseline) = (&images, &baseline);
            s.spawn(move || {
                for _ in 0..5 {
                    for (img, expected) in images.iter().zip(baseline) {
                        let boxes = detector.detect(img).expect("detection failed");
                        assert_eq!(&boxes, expected);
                    }
                }
            });
        }
    });

    // Baseline pass plus five passes on each of the four detectors
    assert_eq!(runs.load(Ordering::SeqCst), images.len() * (1 + 4 * 5));
    Ok(())
}

#[test]
fn test_shared_detector_serializes_calls() -> anyhow::Result<()> {
    let detector = TextDetector::new(Box::new(BrightPixelEngine::new(0.9)));
    let first = image_with_rects(200, 100, &[(40, 30, 119, 49)]);
    let second = image_with_rects(300, 90, &[(5, 5, 204, 44), (220, 50, 289, 79)]);

    let expected_first = detector.detect(&first)?;
    let expected_second = detector.detect(&second)?;
    assert_eq!(expected_first.len(), 1);
    assert_eq!(expected_second.len(), 2);

    thread::scope(|s| {
        let d = &detector;
        s.spawn(|| {
            for _ in 0..10 {
                assert_eq!(d.detect(&first).expect("first image"), expected_first);
            }
        });
        s.spawn(|| {
            for _ in 0..10 {
                assert_eq!(d.detect(&second).expect("second image"), expected_second);
            }
        });
    });

    Ok(())
}

#[test]
fn test_clone_keeps_configuration_but_not_later_changes() -> anyhow::Result<()> {
    let mut original = TextDetector::new(Box::new(BrightPixelEngine::new(0.5)));
    original.set_config(DetectorConfig::new().with_box_score_threshold(None));

    let clone = original.try_clone()?;
    assert_eq!(clone.config(), original.config());

    original.config_mut().box_score_threshold = Some(0.7);
    let img = image_with_rects(120, 60, &[(10, 10, 89, 29)]);
    assert!(original.detect(&img)?.is_empty());
    assert_eq!(clone.detect(&img)?.len(), 1);

    Ok(())
}
