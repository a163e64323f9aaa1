use crate::aggregate::CategoryFilter;
use crate::models::{
    AggregateStats, AlertView, CategoryCount, DateBounds, HeatPoint, LocationCount, ResolvedAlert,
};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_TOP_N: usize = 10;

/// Number of alerts the viewer lists next to the map.
pub const LIST_LIMIT: usize = 100;

pub fn compute_stats(resolved: &[ResolvedAlert], top_n: usize) -> AggregateStats {
    let mut by_category: Vec<CategoryCount> = Vec::new();
    let mut by_location: Vec<LocationCount> = Vec::new();
    let mut location_index: HashMap<&str, usize> = HashMap::new();

    for alert in resolved {
        match by_category.iter_mut().find(|entry| entry.category == alert.category) {
            Some(entry) => entry.count += 1,
            None => by_category.push(CategoryCount {
                category: alert.category,
                count: 1,
            }),
        }

        let index = *location_index.entry(alert.location.as_str()).or_insert_with(|| {
            by_location.push(LocationCount {
                location: alert.location.clone(),
                count: 0,
            });
            by_location.len() - 1
        });
        by_location[index].count += 1;
    }

    // Stable sort: equal counts keep first-seen order.
    let mut top_locations = by_location.clone();
    top_locations.sort_by(|a, b| b.count.cmp(&a.count));
    top_locations.truncate(top_n);

    AggregateStats {
        total: resolved.len(),
        by_category,
        by_location,
        top_locations,
        date_range: date_bounds(resolved),
    }
}

fn date_bounds(resolved: &[ResolvedAlert]) -> Option<DateBounds> {
    let first = resolved.first()?.date;
    let (min, max) = resolved
        .iter()
        .fold((first, first), |(min, max), alert| (min.min(alert.date), max.max(alert.date)));
    Some(DateBounds { min, max })
}

fn coord_key(alert: &ResolvedAlert) -> (u64, u64) {
    (alert.lat.to_bits(), alert.lon.to_bits())
}

/// One weighted point per distinct coordinate, in first-seen order.
pub fn compute_heatmap_weights(resolved: &[ResolvedAlert]) -> Vec<HeatPoint> {
    let mut points: Vec<HeatPoint> = Vec::new();
    let mut index: HashMap<(u64, u64), usize> = HashMap::new();

    for alert in resolved {
        let slot = *index.entry(coord_key(alert)).or_insert_with(|| {
            points.push(HeatPoint {
                lat: alert.lat,
                lon: alert.lon,
                weight: 0,
            });
            points.len() - 1
        });
        points[slot].weight += 1;
    }

    points
}

/// The first alert at each distinct coordinate.
pub fn compute_unique_markers(resolved: &[ResolvedAlert]) -> Vec<ResolvedAlert> {
    let mut seen = HashSet::new();
    resolved
        .iter()
        .filter(|alert| seen.insert(coord_key(alert)))
        .cloned()
        .collect()
}

pub fn build_view(resolved: &[ResolvedAlert], filter: CategoryFilter, top_n: usize) -> AlertView {
    let filtered = filter.apply(resolved);
    AlertView {
        alerts: filtered.iter().take(LIST_LIMIT).cloned().collect(),
        total: filtered.len(),
        stats: compute_stats(&filtered, top_n),
        heatmap: compute_heatmap_weights(&filtered),
        markers: compute_unique_markers(&filtered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at(day: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            + Duration::days(day)
    }

    fn alert(location: &str, category: Category, lat: f64, lon: f64, day: i64) -> ResolvedAlert {
        ResolvedAlert {
            date: at(day),
            title: format!("{location} #{day}"),
            location: location.to_string(),
            category,
            lat,
            lon,
        }
    }

    fn sample() -> Vec<ResolvedAlert> {
        vec![
            alert("Sderot", Category::RocketMissileFire, 31.52, 34.59, 3),
            alert("Ashkelon", Category::RocketMissileFire, 31.67, 34.57, 1),
            alert("Sderot", Category::HostileAircraftIntrusion, 31.52, 34.59, 5),
            alert("Ashkelon", Category::Unknown, 31.67, 34.57, 0),
            alert("Nahariya", Category::HostileAircraftIntrusion, 33.0, 35.09, 2),
        ]
    }

    #[test]
    fn stats_tally_categories_and_locations() {
        let stats = compute_stats(&sample(), DEFAULT_TOP_N);
        assert_eq!(stats.total, 5);
        assert_eq!(
            stats.by_category,
            vec![
                CategoryCount { category: Category::RocketMissileFire, count: 2 },
                CategoryCount { category: Category::HostileAircraftIntrusion, count: 2 },
                CategoryCount { category: Category::Unknown, count: 1 },
            ]
        );
        let locations: Vec<_> = stats
            .by_location
            .iter()
            .map(|entry| (entry.location.as_str(), entry.count))
            .collect();
        assert_eq!(locations, vec![("Sderot", 2), ("Ashkelon", 2), ("Nahariya", 1)]);
    }

    #[test]
    fn top_locations_break_ties_by_first_seen() {
        let stats = compute_stats(&sample(), 2);
        let top: Vec<_> = stats.top_locations.iter().map(|e| e.location.as_str()).collect();
        assert_eq!(top, vec!["Sderot", "Ashkelon"]);

        let mut reordered = sample();
        reordered.swap(0, 1);
        let stats = compute_stats(&reordered, 2);
        let top: Vec<_> = stats.top_locations.iter().map(|e| e.location.as_str()).collect();
        assert_eq!(top, vec!["Ashkelon", "Sderot"]);
    }

    #[test]
    fn top_locations_sorted_descending() {
        let mut alerts = sample();
        alerts.push(alert("Nahariya", Category::Unknown, 33.0, 35.09, 9));
        alerts.push(alert("Nahariya", Category::Unknown, 33.0, 35.09, 9));
        let stats = compute_stats(&alerts, DEFAULT_TOP_N);
        assert_eq!(stats.top_locations[0].location, "Nahariya");
        assert_eq!(stats.top_locations[0].count, 3);
        assert_eq!(stats.top_locations.len(), 3);
    }

    #[test]
    fn date_range_spans_min_and_max() {
        let stats = compute_stats(&sample(), DEFAULT_TOP_N);
        assert_eq!(stats.date_range, Some(DateBounds { min: at(0), max: at(5) }));
    }

    #[test]
    fn empty_input_has_no_date_range() {
        let stats = compute_stats(&[], DEFAULT_TOP_N);
        assert_eq!(stats.total, 0);
        assert!(stats.by_category.is_empty());
        assert!(stats.top_locations.is_empty());
        assert_eq!(stats.date_range, None);
    }

    #[test]
    fn heatmap_weights_count_each_coordinate() {
        let heat = compute_heatmap_weights(&sample());
        assert_eq!(
            heat,
            vec![
                HeatPoint { lat: 31.52, lon: 34.59, weight: 2 },
                HeatPoint { lat: 31.67, lon: 34.57, weight: 2 },
                HeatPoint { lat: 33.0, lon: 35.09, weight: 1 },
            ]
        );
        let total: usize = heat.iter().map(|p| p.weight).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn markers_keep_first_alert_per_coordinate() {
        let alerts = sample();
        let markers = compute_unique_markers(&alerts);
        assert_eq!(markers, vec![alerts[0].clone(), alerts[1].clone(), alerts[4].clone()]);
    }

    #[test]
    fn view_applies_filter_before_aggregating() {
        let view = build_view(
            &sample(),
            CategoryFilter::Only(Category::HostileAircraftIntrusion),
            DEFAULT_TOP_N,
        );
        assert_eq!(view.total, 2);
        assert_eq!(view.alerts.len(), 2);
        assert_eq!(view.stats.total, 2);
        assert_eq!(view.heatmap.len(), 2);
        assert_eq!(view.markers.len(), 2);
    }

    #[test]
    fn view_lists_at_most_limit() {
        let alerts: Vec<_> = (0..150)
            .map(|i| alert("Sderot", Category::RocketMissileFire, 31.52, 34.59, i))
            .collect();
        let view = build_view(&alerts, CategoryFilter::All, DEFAULT_TOP_N);
        assert_eq!(view.alerts.len(), LIST_LIMIT);
        assert_eq!(view.total, 150);
        assert_eq!(view.markers.len(), 1);
        assert_eq!(view.heatmap[0].weight, 150);
    }
}
