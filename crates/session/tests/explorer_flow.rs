use compute::Season;
use formats::{FeatureCollection, decode_fire_records, decode_regions};
use foundation::ids::RecordId;
use foundation::math::{Equirectangular, Vec2};
use foundation::time::Time;
use layers::fire::MarkOp;
use pretty_assertions::assert_eq;
use scene::viewport::ViewportSize;
use serde_json::{Value, json};
use session::{Explorer, ExplorerConfig, LoadingState, SelectionControls, Surface};

const MAP_W: f64 = 975.0;
const MAP_H: f64 = 610.0;

fn square(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> Value {
    json!([[[lon0, lat0], [lon1, lat0], [lon1, lat1], [lon0, lat1], [lon0, lat0]]])
}

fn regions_json() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "NAME": "Alpha" },
              "geometry": { "type": "Polygon", "coordinates": square(-110.0, 35.0, -100.0, 45.0) } },
            { "type": "Feature", "properties": { "NAME": "Beta" },
              "geometry": { "type": "Polygon", "coordinates": square(-90.0, 30.0, -80.0, 40.0) } },
            { "type": "Feature", "properties": { "NAME": "Gamma" },
              "geometry": { "type": "Polygon", "coordinates": square(-120.0, 48.0, -118.0, 49.0) } }
        ]
    })
}

fn fire(id: &str, lon: f64, lat: f64, brightness: f64, date: &str, flag: &str) -> Value {
    json!({
        "type": "Feature",
        "properties": { "id": id, "BRIGHTNESS": brightness, "ACQ_DATE": date,
                        "ACQ_TIME": "0130", "DAYNIGHT": flag },
        "geometry": { "type": "Point", "coordinates": [lon, lat] }
    })
}

/// Brightness {320, 330, 400, 500} in {Jan, Jan, Jun, Jun}.
fn fires_json() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            fire("jan-320", -105.0, 41.0, 320.0, "2024-01-10", "D"),
            fire("jan-330", -105.0, 40.0, 330.0, "2024-01-15", "N"),
            fire("jun-400", -85.0, 35.0, 400.0, "2024-06-10", "D"),
            fire("jun-500", -85.0, 36.0, 500.0, "2024-06-20", "D")
        ]
    })
}

fn explorer() -> Explorer {
    let fires = FeatureCollection::from_geojson_value(fires_json()).unwrap();
    let regions = FeatureCollection::from_geojson_value(regions_json()).unwrap();
    Explorer::new(
        decode_fire_records(&fires),
        decode_regions(&regions),
        ExplorerConfig::default(),
        Box::new(Equirectangular::conus(MAP_W, MAP_H)),
        Surface {
            map: ViewportSize::new(MAP_W, MAP_H),
            chart: ViewportSize::new(288.0, 166.0),
        },
        Time(0.0),
    )
    .unwrap()
}

fn ready_explorer() -> Explorer {
    let mut ex = explorer();
    ex.redraw();
    assert!(ex.tick(Time(1.0)).is_some());
    ex
}

fn visible_ids(ex: &Explorer) -> Vec<String> {
    ex.visible_records().map(|r| r.id.to_string()).collect()
}

fn only(ex: &mut Explorer, seasons: &[Season]) {
    for s in Season::ALL {
        ex.on_season_toggle(s, seasons.contains(&s));
    }
}

#[test]
fn winter_at_lowest_notch_shows_only_the_january_330() {
    let mut ex = ready_explorer();
    only(&mut ex, &[Season::Winter]);
    ex.on_brightness_change(325.0);
    assert_eq!(visible_ids(&ex), vec!["jan-330"]);
}

#[test]
fn empty_season_selection_hides_everything() {
    let mut ex = ready_explorer();
    only(&mut ex, &[]);
    assert!(ex.visible().is_empty());
    ex.on_region_click("Beta");
    assert!(ex.visible().is_empty());
    assert_eq!(
        ex.subtitles().time_frame,
        "Time Frame Currently Displaying: none"
    );
    // The chart still shows both months.
    assert!(ex.monthly_averages().get(foundation::time::Month::June).is_some());
    assert!(ex.chart().bands.iter().all(|b| !b.visible));
}

#[test]
fn toggling_a_season_off_and_on_is_lossless() {
    let mut ex = ready_explorer();
    ex.on_region_click("Beta");
    let before = ex.visible().to_vec();
    let chart_before = ex.chart().clone();

    ex.on_season_toggle(Season::Summer, false);
    assert!(ex.visible().is_empty());
    ex.on_season_toggle(Season::Summer, true);

    assert_eq!(ex.visible(), before.as_slice());
    assert_eq!(ex.chart(), &chart_before);
}

#[test]
fn region_without_points_yields_nothing() {
    let mut ex = ready_explorer();
    let refresh = ex.on_region_click("Gamma");
    assert!(ex.visible().is_empty());
    assert_eq!(refresh.marks.len(), 3);
    assert!(refresh.marks.iter().all(|op| matches!(op, MarkOp::Exit { .. })));
    assert!(ex.chart().points.iter().all(|p| p.y.is_none()));
}

#[test]
fn finish_loading_indexes_before_the_due_time() {
    let mut ex = explorer();
    let refresh = ex.finish_loading().unwrap();
    assert_eq!(ex.loading_state(), LoadingState::Ready);
    assert_eq!(refresh.marks.len(), 3);
    assert_eq!(ex.index_summary().unwrap().matched, 4);
    assert!(ex.finish_loading().is_none());
    assert!(ex.tick(Time(1.0)).is_none());
}

#[test]
fn region_filter_waits_for_the_index() {
    let mut ex = explorer();
    assert_eq!(ex.loading_state(), LoadingState::Loading);
    ex.redraw();
    assert_eq!(visible_ids(&ex), vec!["jan-330", "jun-400", "jun-500"]);

    // Untagged records cannot match a region yet.
    ex.on_region_click("Beta");
    assert!(ex.visible().is_empty());
    assert!(ex.tick(Time(0.01)).is_none());

    let refresh = ex.tick(Time(0.05)).unwrap();
    assert_eq!(ex.loading_state(), LoadingState::Ready);
    assert_eq!(visible_ids(&ex), vec!["jun-400", "jun-500"]);
    assert_eq!(refresh.marks.len(), 2);
    assert!(ex.events().last_of(session::EVENT_INDEXED).is_some());

    let summary = ex.index_summary().unwrap();
    assert_eq!(summary.matched, 4);
    assert_eq!(summary.unknown, 0);
    assert!(ex.tick(Time(5.0)).is_none());
}

#[test]
fn fit_centers_the_selected_region() {
    let mut ex = ready_explorer();
    assert!(ex.fit_to_selection().is_none());

    ex.on_region_click("Alpha");
    assert_eq!(
        ex.controls(),
        SelectionControls {
            reset_visible: true,
            zoom_in_visible: true,
            zoom_out_visible: false,
        }
    );
    let change = ex.fit_to_selection().unwrap();
    assert_eq!(change.duration_ms, 700);
    assert!(ex.controls().zoom_out_visible);

    let proj = Equirectangular::conus(MAP_W, MAP_H);
    let a = foundation::math::Projection::project(&proj, -110.0, 45.0).unwrap();
    let b = foundation::math::Projection::project(&proj, -100.0, 35.0).unwrap();
    let centroid = Vec2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
    let mapped = change.transform.apply(centroid);
    assert!((mapped.x - MAP_W / 2.0).abs() < 1.0, "x = {}", mapped.x);
    assert!((mapped.y - MAP_H / 2.0).abs() < 1.0, "y = {}", mapped.y);

    // Filter changes never move the viewport.
    ex.on_brightness_change(450.0);
    assert_eq!(ex.viewport(), change.transform);

    // Zoom out keeps the selection.
    assert!(ex.zoom_out().unwrap().transform.is_identity());
    assert!(!ex.controls().zoom_out_visible);
    assert_eq!(ex.subtitles().regions, "States: Alpha");
}

#[test]
fn reset_clears_selection_and_viewport() {
    let mut ex = ready_explorer();
    ex.on_region_click("Beta");
    ex.on_region_click("Alpha");
    assert_eq!(ex.subtitles().regions, "States: Alpha, Beta");
    ex.fit_to_selection().unwrap();

    let refresh = ex.reset_selection();
    let change = refresh.viewport.unwrap();
    assert!(change.transform.is_identity());
    assert_eq!(change.duration_ms, 600);
    assert_eq!(ex.controls(), SelectionControls::default());
    assert!(ex.viewport().is_identity());
    assert_eq!(ex.subtitles().regions, "States: all states");
    let styles = refresh.regions.unwrap();
    assert!(styles.iter().all(|s| !s.selected));
    assert_eq!(visible_ids(&ex), vec!["jan-330", "jun-400", "jun-500"]);
}

#[test]
fn second_click_deselects() {
    let mut ex = ready_explorer();
    ex.on_region_click("Alpha");
    let refresh = ex.on_region_click("Alpha");
    assert_eq!(ex.controls(), SelectionControls::default());
    assert!(refresh.regions.unwrap().iter().all(|s| !s.selected));
    assert_eq!(ex.visible().len(), 3);

    let unknown = ex.on_region_click("Atlantis");
    assert!(unknown.marks.is_empty());
}

#[test]
fn brightness_between_notches_is_snapped() {
    let mut ex = ready_explorer();
    ex.on_brightness_change(462.0);
    assert_eq!(ex.filter().brightness_threshold, 450.0);
    assert_eq!(visible_ids(&ex), vec!["jun-500"]);
}

#[test]
fn hover_describes_drawn_marks() {
    let mut ex = ready_explorer();
    let t = ex.on_hover(&RecordId::new("jan-330")).unwrap();
    assert_eq!(t.brightness, "330.00");
    assert_eq!(t.date, "1/15/2024 01:30");
    assert_eq!(t.day_night, "Night");
    assert_eq!(t.region, "Alpha");
    assert_eq!(t.lat.as_deref(), Some("40.0000°"));

    // Hidden marks have no tooltip.
    assert!(ex.on_hover(&RecordId::new("jan-320")).is_none());
    only(&mut ex, &[Season::Summer]);
    assert!(ex.on_hover(&RecordId::new("jan-330")).is_none());
}

#[test]
fn subtitles_follow_the_dataset_span() {
    let mut ex = ready_explorer();
    assert_eq!(
        ex.subtitles().time_frame,
        "Time Frame Currently Displaying: January 2024–June 2024"
    );
    only(&mut ex, &[Season::Winter, Season::Summer]);
    assert_eq!(
        ex.subtitles().time_frame,
        "Time Frame Currently Displaying: January 2024–January 2024, May 2024–June 2024"
    );
    let labels = ex.season_labels();
    assert_eq!(labels[0].1, "Winter (November 2023–January 2024)");
}

#[test]
fn resize_relayouts_the_chart() {
    let mut ex = ready_explorer();
    let frame = ex
        .on_resize(Surface {
            map: ViewportSize::new(MAP_W, MAP_H),
            chart: ViewportSize::new(528.0, 266.0),
        })
        .clone();
    assert!((frame.width - 480.0).abs() < 1e-9);
    assert!((frame.height - 200.0).abs() < 1e-9);
    assert!((frame.points[0].x - 20.0).abs() < 1e-9);
}
