//! Aggregation of the POIs inside a drawn region.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{PoiCollection, PoiId, PoiRecord};
use crate::region::Region;

use super::summary::{
    CategoryGroup, PriceExtreme, PriceStats, RatingExtreme, RatingStats, SelectionReport,
    SelectionSummary,
};

/// Summarise the POIs of `pois` that lie inside `region`, evaluating opening
/// hours at the local time `at`.
///
/// The collection is scanned once, in order. Where two POIs tie for a
/// minimum or maximum, the one seen first keeps the title. Malformed price,
/// rating and schedule attributes are treated as unknown and never affect
/// other POIs.
pub fn aggregate(region: &Region, pois: &PoiCollection, at: NaiveDateTime) -> SelectionSummary {
    let selected: Vec<(PoiId, &PoiRecord)> = pois
        .iter()
        .filter(|(_, poi)| region.contains(poi.coordinate))
        .collect();

    debug!(
        selected = selected.len(),
        total = pois.len(),
        "containment scan finished"
    );

    if selected.is_empty() {
        return SelectionSummary::Empty {
            anchor: region.anchor(),
        };
    }

    let mut open_names = Vec::new();
    let mut categories: Vec<CategoryGroup> = Vec::new();
    let mut prices = PriceAccumulator::default();
    let mut ratings = RatingStats::default();

    for &(id, poi) in &selected {
        let name = poi.display_name();

        if poi.is_open_at(at) {
            open_names.push(name.to_string());
        }

        let category = poi.category_label();
        match categories.iter_mut().find(|g| g.category == category) {
            Some(group) => group.names.push(name.to_string()),
            None => categories.push(CategoryGroup {
                category: category.to_string(),
                names: vec![name.to_string()],
            }),
        }

        prices.add(id, poi);

        if let Some(value) = poi.rating() {
            let extreme = || RatingExtreme {
                id,
                name: name.to_string(),
                value,
            };
            // Trackers start at +/-infinity, so an infinite rating never
            // claims the end of the scale it is equal to
            let low = ratings.lowest.as_ref().map_or(f64::INFINITY, |l| l.value);
            if value < low {
                ratings.lowest = Some(extreme());
            }
            let high = ratings.highest.as_ref().map_or(f64::NEG_INFINITY, |h| h.value);
            if value > high {
                ratings.highest = Some(extreme());
            }
        }
    }

    SelectionSummary::Selected(Box::new(SelectionReport {
        anchor: region.anchor(),
        selected_count: selected.len(),
        selected: selected.iter().map(|(id, _)| *id).collect(),
        open_count: open_names.len(),
        open_names,
        categories,
        price: prices.finish(),
        rating: ratings,
    }))
}

/// Running price statistics.
#[derive(Default)]
struct PriceAccumulator {
    sum: f64,
    count: usize,
    cheapest: Option<PriceExtreme>,
    priciest: Option<PriceExtreme>,
}

impl PriceAccumulator {
    fn add(&mut self, id: PoiId, poi: &PoiRecord) {
        let (Some(range), Some(raw)) = (poi.price_range(), poi.price_range_raw.as_deref()) else {
            return;
        };

        self.sum += range.average;
        self.count += 1;

        let extreme = |value: f64| PriceExtreme {
            id,
            name: poi.display_name().to_string(),
            value,
            range: raw.to_string(),
        };

        if self.cheapest.as_ref().is_none_or(|c| range.min < c.value) {
            self.cheapest = Some(extreme(range.min));
        }
        if self.priciest.as_ref().is_none_or(|p| range.max > p.value) {
            self.priciest = Some(extreme(range.max));
        }
    }

    fn finish(self) -> PriceStats {
        PriceStats {
            average: (self.count > 0).then(|| self.sum / self.count as f64),
            valid_count: self.count,
            cheapest: self.cheapest,
            priciest: self.priciest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use geo::Coord;

    /// Tuesday 2024-03-12, 12:00.
    fn tuesday_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 12)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn square() -> Region {
        Region::from_corners(Coord { x: 0.0, y: 0.0 }, Coord { x: 100.0, y: 100.0 }).unwrap()
    }

    fn inside(name: &str) -> PoiRecord {
        PoiRecord::at(Coord { x: 50.0, y: 50.0 }).with_name(name)
    }

    fn outside(name: &str) -> PoiRecord {
        PoiRecord::at(Coord { x: 500.0, y: 500.0 }).with_name(name)
    }

    fn report(summary: &SelectionSummary) -> &SelectionReport {
        summary.report().expect("expected a non-empty selection")
    }

    #[test]
    fn empty_selection_carries_only_anchor() {
        let pois = PoiCollection::new(vec![outside("far")]);
        let summary = aggregate(&square(), &pois, tuesday_noon());

        assert_eq!(summary.selected_count(), 0);
        assert_eq!(
            summary,
            SelectionSummary::Empty {
                anchor: Coord { x: 50.0, y: 50.0 }
            }
        );
        assert!(summary.report().is_none());
    }

    #[test]
    fn empty_collection_is_empty_selection() {
        let summary = aggregate(&square(), &PoiCollection::default(), tuesday_noon());
        assert_eq!(summary.selected_count(), 0);
    }

    #[test]
    fn counts_only_contained_pois() {
        let pois = PoiCollection::new(vec![inside("a"), outside("b"), inside("c")]);
        let summary = aggregate(&square(), &pois, tuesday_noon());
        let report = report(&summary);

        assert_eq!(report.selected_count, 2);
        assert_eq!(report.selected, vec![PoiId(0), PoiId(2)]);
        assert_eq!(report.anchor, Coord { x: 50.0, y: 50.0 });
    }

    #[test]
    fn open_now() {
        let pois = PoiCollection::new(vec![
            inside("lunch").with_open_hours("Mo-Fr 11:00-14:00"),
            inside("dinner").with_open_hours("Mo-Fr 17:00-22:00"),
            inside("unknown"),
            inside("garbled").with_open_hours("whenever"),
        ]);
        let summary = aggregate(&square(), &pois, tuesday_noon());
        let report = report(&summary);

        assert_eq!(report.open_count, 1);
        assert_eq!(report.open_names, vec!["lunch".to_string()]);
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let pois = PoiCollection::new(vec![
            inside("a").with_category("Thai"),
            inside("b").with_category("Italian"),
            PoiRecord::at(Coord { x: 10.0, y: 10.0 }),
            inside("d").with_category("Thai"),
        ]);
        let summary = aggregate(&square(), &pois, tuesday_noon());
        let report = report(&summary);

        assert_eq!(
            report.categories,
            vec![
                CategoryGroup {
                    category: "Thai".into(),
                    names: vec!["a".into(), "d".into()],
                },
                CategoryGroup {
                    category: "Italian".into(),
                    names: vec!["b".into()],
                },
                CategoryGroup {
                    category: "Other".into(),
                    names: vec!["NA".into()],
                },
            ]
        );
    }

    #[test]
    fn price_statistics() {
        let pois = PoiCollection::new(vec![
            inside("mid").with_price_range("100-200"),
            inside("cheap").with_price_range("50-90"),
            inside("broken").with_price_range("free"),
            inside("dear").with_price_range("150-400"),
        ]);
        let summary = aggregate(&square(), &pois, tuesday_noon());
        let price = &report(&summary).price;

        assert_eq!(price.valid_count, 3);
        // (150 + 70 + 275) / 3
        assert_eq!(price.average, Some(165.0));

        let cheapest = price.cheapest.as_ref().unwrap();
        assert_eq!(cheapest.name, "cheap");
        assert_eq!(cheapest.value, 50.0);
        assert_eq!(cheapest.range, "50-90");

        let priciest = price.priciest.as_ref().unwrap();
        assert_eq!(priciest.name, "dear");
        assert_eq!(priciest.id, PoiId(3));
        assert_eq!(priciest.value, 400.0);
    }

    #[test]
    fn price_ties_keep_first_poi() {
        let pois = PoiCollection::new(vec![
            inside("first").with_price_range("50-100"),
            inside("second").with_price_range("50-100"),
        ]);
        let summary = aggregate(&square(), &pois, tuesday_noon());
        let price = &report(&summary).price;

        assert_eq!(price.cheapest.as_ref().unwrap().name, "first");
        assert_eq!(price.priciest.as_ref().unwrap().name, "first");
    }

    #[test]
    fn no_valid_prices_means_no_average() {
        let pois = PoiCollection::new(vec![inside("a").with_price_range("n/a")]);
        let summary = aggregate(&square(), &pois, tuesday_noon());
        let price = &report(&summary).price;

        assert_eq!(price.average, None);
        assert_eq!(price.valid_count, 0);
        assert!(price.cheapest.is_none());
        assert!(price.priciest.is_none());
    }

    #[test]
    fn rating_statistics_and_ties() {
        let pois = PoiCollection::new(vec![
            inside("ok").with_rating("3.5"),
            inside("great").with_rating("4.8"),
            inside("also great").with_rating("4.8"),
            inside("unrated").with_rating("N/A"),
            inside("poor").with_rating("2"),
        ]);
        let summary = aggregate(&square(), &pois, tuesday_noon());
        let rating = &report(&summary).rating;

        let lowest = rating.lowest.as_ref().unwrap();
        assert_eq!(lowest.name, "poor");
        assert_eq!(lowest.value, 2.0);

        let highest = rating.highest.as_ref().unwrap();
        assert_eq!(highest.name, "great");
        assert_eq!(highest.id, PoiId(1));
    }

    #[test]
    fn equal_lowest_rating_keeps_first() {
        let pois = PoiCollection::new(vec![
            inside("fine").with_rating("3.9"),
            inside("meh").with_rating("2.5"),
            inside("also meh").with_rating("2.5"),
        ]);
        let summary = aggregate(&square(), &pois, tuesday_noon());
        let lowest = report(&summary).rating.lowest.as_ref().unwrap();

        assert_eq!(lowest.name, "meh");
        assert_eq!(lowest.id, PoiId(1));
    }

    #[test]
    fn infinite_ratings_only_claim_the_far_end() {
        let pois = PoiCollection::new(vec![inside("boundless").with_rating("Infinity")]);
        let summary = aggregate(&square(), &pois, tuesday_noon());
        let rating = &report(&summary).rating;
        assert!(rating.lowest.is_none());
        assert_eq!(rating.highest.as_ref().unwrap().name, "boundless");

        let pois = PoiCollection::new(vec![inside("bottomless").with_rating("-Infinity")]);
        let summary = aggregate(&square(), &pois, tuesday_noon());
        let rating = &report(&summary).rating;
        assert_eq!(rating.lowest.as_ref().unwrap().name, "bottomless");
        assert!(rating.highest.is_none());
    }

    #[test]
    fn repeated_aggregation_is_identical() {
        let pois = PoiCollection::new(vec![
            inside("a")
                .with_category("Cafe")
                .with_price_range("30-60")
                .with_rating("4.1")
                .with_open_hours("Tu 08:00-18:00"),
            inside("b").with_price_range("80-120").with_rating("3.9"),
            outside("c").with_price_range("1-2"),
        ]);
        let region = square();

        let first = aggregate(&region, &pois, tuesday_noon());
        let second = aggregate(&region, &pois, tuesday_noon());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn summary_serializes_with_kind_tag() {
        let pois = PoiCollection::new(vec![inside("a")]);
        let json = serde_json::to_value(aggregate(&square(), &pois, tuesday_noon())).unwrap();
        assert_eq!(json["kind"], "selected");
        assert_eq!(json["selected_count"], 1);
        assert_eq!(json["anchor"], serde_json::json!([50.0, 50.0]));

        let empty = serde_json::to_value(aggregate(
            &square(),
            &PoiCollection::default(),
            tuesday_noon(),
        ))
        .unwrap();
        assert_eq!(empty["kind"], "empty");
    }
}
