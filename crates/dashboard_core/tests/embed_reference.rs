use dashboard_core::{
    compute_embed_reference, render_embed_markup, EmbedDelivery, EmbedTarget, EmbedTargetError,
    RefreshSignal,
};
use pretty_assertions::assert_eq;

const BASE: &str =
    "https://viz.example.com/t/site/views/Diploma/Dashboard1?:embed=y&:showVizHome=no&:tabs=no";

fn target() -> EmbedTarget {
    EmbedTarget::parse(BASE).expect("valid base")
}

#[test]
fn unset_signal_returns_base_unchanged() {
    let reference = compute_embed_reference(RefreshSignal::Unset, &target());
    assert_eq!(reference.as_str(), BASE);
    assert!(!reference.as_str().is_empty());
}

#[test]
fn stamp_is_appended_as_discriminator() {
    let reference = compute_embed_reference(RefreshSignal::Stamp(1234), &target());
    assert_eq!(reference.as_str(), format!("{BASE}&:refresh_key=1234"));
}

#[test]
fn base_without_query_gets_one() {
    let target = EmbedTarget::parse("https://viz.example.com/views/Sales").unwrap();
    let reference = compute_embed_reference(RefreshSignal::Stamp(7), &target);
    assert_eq!(
        reference.as_str(),
        "https://viz.example.com/views/Sales?:refresh_key=7"
    );
}

#[test]
fn fragment_stays_after_query() {
    let target = EmbedTarget::parse("https://viz.example.com/views/Sales?:embed=y#top").unwrap();
    let reference = compute_embed_reference(RefreshSignal::Stamp(7), &target);
    assert_eq!(
        reference.as_str(),
        "https://viz.example.com/views/Sales?:embed=y&:refresh_key=7#top"
    );
}

#[test]
fn distinct_signals_give_distinct_references() {
    let target = target();
    let signals = [
        RefreshSignal::Unset,
        RefreshSignal::Stamp(0),
        RefreshSignal::Stamp(1),
        RefreshSignal::Stamp(10),
        RefreshSignal::Stamp(1_700_000_000_000),
        RefreshSignal::Stamp(u64::MAX),
    ];
    for (i, a) in signals.iter().enumerate() {
        for b in &signals[i + 1..] {
            assert_ne!(
                compute_embed_reference(*a, &target),
                compute_embed_reference(*b, &target),
                "{a:?} vs {b:?}"
            );
        }
    }
}

#[test]
fn derivation_is_deterministic() {
    let target = target();
    let first = compute_embed_reference(RefreshSignal::Stamp(99), &target);
    for _ in 0..10 {
        assert_eq!(compute_embed_reference(RefreshSignal::Stamp(99), &target), first);
    }
}

#[test]
fn configured_refresh_param_is_stripped_from_base() {
    let target =
        EmbedTarget::parse("https://viz.example.com/views/Sales?:embed=y&:refresh_key=5").unwrap();
    assert_eq!(target.as_str(), "https://viz.example.com/views/Sales?:embed=y");

    let unset = compute_embed_reference(RefreshSignal::Unset, &target);
    let stamped = compute_embed_reference(RefreshSignal::Stamp(5), &target);
    assert_ne!(unset, stamped);
    assert_eq!(stamped.as_str().matches(":refresh_key").count(), 1);
}

#[test]
fn target_rejects_non_http_urls() {
    assert!(matches!(
        EmbedTarget::parse("not a url"),
        Err(EmbedTargetError::InvalidUrl(_))
    ));
    assert_eq!(
        EmbedTarget::parse("file:///tmp/dashboard.html"),
        Err(EmbedTargetError::UnsupportedScheme("file".to_string()))
    );
}

#[test]
fn markup_follows_delivery_mode() {
    let target = EmbedTarget::parse("https://viz.example.com/views/Sales?:embed=y").unwrap();
    let reference = compute_embed_reference(RefreshSignal::Stamp(3), &target);

    let iframe = render_embed_markup(&reference, EmbedDelivery::Iframe { height: 600 });
    assert_eq!(
        iframe,
        "<iframe src=\"https://viz.example.com/views/Sales?:embed=y&amp;:refresh_key=3\" \
         width=\"100%\" height=\"600\" frameborder=\"0\" allowfullscreen title=\"Dashboard\"></iframe>"
    );

    let component = render_embed_markup(&reference, EmbedDelivery::WebComponent);
    assert!(component.starts_with("<tableau-viz src=\"https://viz.example.com/views/Sales?"));
    assert!(component.contains(":refresh_key=3"));
}
