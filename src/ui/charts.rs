use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Stroke, Ui, Vec2};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points, Polygon,
};

use crate::color::{heat, ColorMap};
use crate::data::aggregate::{aggregate_by, collect_by, Reducer};
use crate::data::model::{KeyField, NumericField, Record};
use crate::data::stats::{box_summary, histogram};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn base_plot(id: &str, height: f32) -> Plot {
    Plot::new(id)
        .height(height)
        .legend(Legend::default())
        .allow_scroll(false)
        .allow_boxed_zoom(true)
}

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn iso_day(key: &str) -> Option<f64> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok().map(day_number)
}

/// Axis labels for an x axis holding [`day_number`] values.
fn date_axis(mark: egui_plot::GridMark, _range: &std::ops::RangeInclusive<f64>) -> String {
    NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// One single-bar chart per category so each gets a legend entry and colour.
fn category_bars(plot_ui: &mut egui_plot::PlotUi, sums: &BTreeMap<Vec<String>, f64>, colors: &ColorMap) {
    for (i, (key, value)) in sums.iter().enumerate() {
        let label = &key[0];
        let color = colors.color_for(label);
        let bar = Bar::new(i as f64, *value).width(0.7).fill(color).name(label);
        plot_ui.bar_chart(BarChart::new(vec![bar]).name(label).color(color));
    }
}

/// Rows split by one key field into `(x, y)` point clouds.
fn point_groups(
    rows: &[&Record],
    by: KeyField,
    x: NumericField,
    y: NumericField,
) -> BTreeMap<String, Vec<[f64; 2]>> {
    let mut groups: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for r in rows {
        groups
            .entry(r.key(by).into_owned())
            .or_default()
            .push([r.value(x), r.value(y)]);
    }
    groups
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Summed index change per market index.
pub fn index_change_by_market_index(ui: &mut Ui, rows: &[&Record], colors: &ColorMap, height: f32) {
    let sums = aggregate_by(
        rows.iter().copied(),
        &[KeyField::MarketIndex],
        NumericField::IndexChangePercent,
        Reducer::Sum,
    );
    base_plot("index_by_market", height)
        .y_axis_label("Index change %")
        .show(ui, |plot_ui| category_bars(plot_ui, &sums, colors));
}

/// Summed trading volume per sector.
pub fn trading_volume_by_sector(ui: &mut Ui, rows: &[&Record], colors: &ColorMap, height: f32) {
    let sums = aggregate_by(
        rows.iter().copied(),
        &[KeyField::Sector],
        NumericField::TradingVolume,
        Reducer::Sum,
    );
    base_plot("volume_by_sector", height)
        .y_axis_label("Trading volume")
        .include_y(0.0)
        .show(ui, |plot_ui| category_bars(plot_ui, &sums, colors));
}

/// Equal-width histogram of index change.
pub fn index_change_histogram(ui: &mut Ui, rows: &[&Record], bins: usize, height: f32) {
    let values: Vec<f64> = rows.iter().map(|r| r.index_change_percent).collect();
    let bars: Vec<Bar> = histogram(&values, bins)
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width() * 0.95)
                .name(format!("{:.2} … {:.2}", b.start, b.end))
        })
        .collect();

    base_plot("index_histogram", height)
        .x_axis_label("Index change %")
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("index_change_percent")
                    .color(Color32::from_rgb(99, 110, 250)),
            );
        });
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// Mean index change per day, one line per market index.
pub fn index_trend(ui: &mut Ui, rows: &[&Record], colors: &ColorMap, height: f32) {
    let means = aggregate_by(
        rows.iter().copied(),
        &[KeyField::MarketIndex, KeyField::Date],
        NumericField::IndexChangePercent,
        Reducer::Mean,
    );
    let mut series: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for (key, mean) in &means {
        if let Some(day) = iso_day(&key[1]) {
            series.entry(key[0].as_str()).or_default().push([day, *mean]);
        }
    }

    base_plot("index_trend", height)
        .x_axis_formatter(date_axis)
        .y_axis_label("Index change %")
        .show(ui, |plot_ui| {
            for (index, pts) in series {
                let color = colors.color_for(index);
                plot_ui.line(
                    Line::new(pts.iter().copied().collect::<PlotPoints>())
                        .name(index)
                        .color(color)
                        .width(1.5),
                );
                plot_ui.points(
                    Points::new(pts.into_iter().collect::<PlotPoints>())
                        .name(index)
                        .color(color)
                        .radius(2.5),
                );
            }
        });
}

/// Daily trading volume per sector as filled areas.
pub fn volume_trend_by_sector(ui: &mut Ui, rows: &[&Record], colors: &ColorMap, height: f32) {
    let sums = aggregate_by(
        rows.iter().copied(),
        &[KeyField::Sector, KeyField::Date],
        NumericField::TradingVolume,
        Reducer::Sum,
    );
    let mut series: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for (key, sum) in &sums {
        if let Some(day) = iso_day(&key[1]) {
            series.entry(key[0].as_str()).or_default().push([day, *sum]);
        }
    }

    base_plot("volume_trend", height)
        .x_axis_formatter(date_axis)
        .y_axis_label("Trading volume")
        .include_y(0.0)
        .show(ui, |plot_ui| {
            for (sector, pts) in series {
                plot_ui.line(
                    Line::new(pts.into_iter().collect::<PlotPoints>())
                        .name(sector)
                        .color(colors.color_for(sector))
                        .fill(0.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter plots
// ---------------------------------------------------------------------------

/// Trading volume (x) against index change (y), coloured by sentiment.
pub fn volume_vs_index_by_sentiment(ui: &mut Ui, rows: &[&Record], colors: &ColorMap, height: f32) {
    let groups = point_groups(
        rows,
        KeyField::Sentiment,
        NumericField::TradingVolume,
        NumericField::IndexChangePercent,
    );
    base_plot("volume_vs_index", height)
        .x_axis_label("Trading volume")
        .y_axis_label("Index change %")
        .show(ui, |plot_ui| {
            for (sentiment, pts) in groups {
                plot_ui.points(
                    Points::new(pts.into_iter().collect::<PlotPoints>())
                        .color(colors.color_for(&sentiment))
                        .radius(3.5)
                        .name(sentiment),
                );
            }
        });
}

/// Index change (x) against trading volume (y), coloured by market index.
pub fn index_vs_volume_by_market_index(ui: &mut Ui, rows: &[&Record], colors: &ColorMap, height: f32) {
    let groups = point_groups(
        rows,
        KeyField::MarketIndex,
        NumericField::IndexChangePercent,
        NumericField::TradingVolume,
    );
    base_plot("index_vs_volume", height)
        .x_axis_label("Index change %")
        .y_axis_label("Trading volume")
        .show(ui, |plot_ui| {
            for (index, pts) in groups {
                plot_ui.points(
                    Points::new(pts.into_iter().collect::<PlotPoints>())
                        .color(colors.color_for(&index))
                        .radius(3.5)
                        .name(index),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Distributions
// ---------------------------------------------------------------------------

/// Box per sector over trading volume. Whiskers span min..max.
pub fn volume_box_by_sector(ui: &mut Ui, rows: &[&Record], colors: &ColorMap, height: f32) {
    let groups = collect_by(rows.iter().copied(), &[KeyField::Sector], NumericField::TradingVolume);

    let boxes: Vec<(String, BoxElem)> = groups
        .iter()
        .enumerate()
        .filter_map(|(i, (key, values))| {
            let s = box_summary(values)?;
            let sector = key[0].clone();
            let color = colors.color_for(&sector);
            let elem = BoxElem::new(i as f64, BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max))
                .name(&sector)
                .box_width(0.6)
                .fill(color.gamma_multiply(0.4))
                .stroke(Stroke::new(1.5, color));
            Some((sector, elem))
        })
        .collect();

    base_plot("volume_box", height)
        .y_axis_label("Trading volume")
        .show(ui, |plot_ui| {
            for (sector, elem) in boxes {
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(sector));
            }
        });
}

/// Sentiment share as a pie built from plot polygons.
pub fn sentiment_pie(ui: &mut Ui, rows: &[&Record], colors: &ColorMap, height: f32) {
    let counts = aggregate_by(
        rows.iter().copied(),
        &[KeyField::Sentiment],
        NumericField::TradingVolume,
        Reducer::Count,
    );
    let total: f64 = counts.values().sum();

    base_plot("sentiment_pie", height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            if total == 0.0 {
                return;
            }
            let mut start = 0.0_f64;
            for (key, count) in &counts {
                let sweep = count / total * std::f64::consts::TAU;
                let label = format!("{} ({:.1}%)", key[0], count / total * 100.0);
                let color = colors.color_for(&key[0]);
                for piece in wedge_pieces(start, sweep) {
                    plot_ui.polygon(
                        Polygon::new(piece.into_iter().collect::<PlotPoints>())
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, color))
                            .name(&label),
                    );
                }
                start += sweep;
            }
        });
}

/// Split a unit-circle wedge into convex pieces of at most a quarter turn,
/// each a fan polygon starting at the centre.
fn wedge_pieces(start: f64, sweep: f64) -> Vec<Vec<[f64; 2]>> {
    const MAX_PIECE: f64 = std::f64::consts::FRAC_PI_2;
    const STEP: f64 = 0.05;

    let n_pieces = (sweep / MAX_PIECE).ceil().max(1.0) as usize;
    let piece_sweep = sweep / n_pieces as f64;

    (0..n_pieces)
        .map(|p| {
            let a0 = start + piece_sweep * p as f64;
            let steps = (piece_sweep / STEP).ceil().max(1.0) as usize;
            let mut pts = vec![[0.0, 0.0]];
            for s in 0..=steps {
                // clockwise from twelve o'clock
                let a = a0 + piece_sweep * s as f64 / steps as f64;
                pts.push([a.sin(), a.cos()]);
            }
            pts
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Heatmap: market event × sector counts
// ---------------------------------------------------------------------------

pub fn event_sector_heatmap(ui: &mut Ui, rows: &[&Record]) {
    let counts = aggregate_by(
        rows.iter().copied(),
        &[KeyField::MarketEvent, KeyField::Sector],
        NumericField::TradingVolume,
        Reducer::Count,
    );
    if counts.is_empty() {
        ui.label("No data");
        return;
    }

    let mut events: Vec<&str> = counts.keys().map(|k| k[0].as_str()).collect();
    events.dedup();
    let mut sectors: Vec<&str> = counts.keys().map(|k| k[1].as_str()).collect();
    sectors.sort_unstable();
    sectors.dedup();
    let max = counts.values().cloned().fold(0.0, f64::max);

    let cell = Vec2::new(86.0, 26.0);
    let hot = Color32::from_rgb(250, 160, 60);

    egui::ScrollArea::horizontal()
        .id_salt("heatmap_scroll")
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("event_sector_heatmap")
                .spacing(Vec2::splat(2.0))
                .show(ui, |ui: &mut Ui| {
                    ui.label("");
                    for event in &events {
                        ui.label(RichText::new(*event).small().strong());
                    }
                    ui.end_row();

                    for sector in &sectors {
                        ui.label(RichText::new(*sector).strong());
                        for event in &events {
                            let key = vec![event.to_string(), sector.to_string()];
                            let n = counts.get(&key).copied().unwrap_or(0.0);
                            let (rect, response) = ui.allocate_exact_size(cell, Sense::hover());
                            ui.painter().rect_filled(rect, 2.0, heat((n / max) as f32, hot));
                            ui.painter().text(
                                rect.center(),
                                Align2::CENTER_CENTER,
                                format!("{n}"),
                                FontId::proportional(12.0),
                                Color32::WHITE,
                            );
                            response.on_hover_text(format!("{event} × {sector}: {n}"));
                        }
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Treemap: impact level → related company, sized by trading volume
// ---------------------------------------------------------------------------

/// Split `rect` into consecutive slices proportional to `weights`.
/// Slices run left-to-right when `horizontal`, top-to-bottom otherwise.
pub fn slice_rect(rect: Rect, weights: &[f64], horizontal: bool) -> Vec<Rect> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(weights.len());
    let mut offset = 0.0_f32;
    for w in weights {
        let frac = (w / total) as f32;
        let r = if horizontal {
            let x0 = rect.min.x + rect.width() * offset;
            let x1 = rect.min.x + rect.width() * (offset + frac);
            Rect::from_min_max(Pos2::new(x0, rect.min.y), Pos2::new(x1, rect.max.y))
        } else {
            let y0 = rect.min.y + rect.height() * offset;
            let y1 = rect.min.y + rect.height() * (offset + frac);
            Rect::from_min_max(Pos2::new(rect.min.x, y0), Pos2::new(rect.max.x, y1))
        };
        out.push(r);
        offset += frac;
    }
    out
}

pub fn impact_company_treemap(ui: &mut Ui, rows: &[&Record], height: f32) {
    let sums = aggregate_by(
        rows.iter().copied(),
        &[KeyField::ImpactLevel, KeyField::RelatedCompany],
        NumericField::TradingVolume,
        Reducer::Sum,
    );
    if sums.is_empty() {
        ui.label("No data");
        return;
    }

    // impact level → [(company, volume)]
    let mut levels: BTreeMap<&str, Vec<(&str, f64)>> = BTreeMap::new();
    for (key, v) in &sums {
        levels.entry(key[0].as_str()).or_default().push((key[1].as_str(), *v));
    }
    let level_names: Vec<&str> = levels.keys().copied().collect();
    let level_weights: Vec<f64> = levels
        .values()
        .map(|cs| cs.iter().map(|(_, v)| v).sum::<f64>())
        .collect();
    let level_colors = ColorMap::new(&level_names.iter().map(|s| s.to_string()).collect::<Vec<_>>());

    let (area, response) = ui.allocate_exact_size(
        Vec2::new(ui.available_width(), height),
        Sense::hover(),
    );
    let painter = ui.painter_at(area);
    let mut hovered: Option<String> = None;

    for ((level, companies), level_rect) in levels
        .iter()
        .zip(slice_rect(area, &level_weights, true))
    {
        let base = level_colors.color_for(level);
        let weights: Vec<f64> = companies.iter().map(|(_, v)| *v).collect();
        for ((company, volume), rect) in companies.iter().zip(slice_rect(level_rect, &weights, false)) {
            let rect = rect.shrink(1.0);
            painter.rect_filled(rect, 2.0, base.gamma_multiply(0.85));
            if rect.height() > 14.0 && rect.width() > 40.0 {
                painter.text(
                    rect.left_top() + Vec2::new(4.0, 2.0),
                    Align2::LEFT_TOP,
                    *company,
                    FontId::proportional(11.0),
                    Color32::WHITE,
                );
            }
            if response.hover_pos().is_some_and(|p| rect.contains(p)) {
                hovered = Some(format!("{level} / {company}: {volume:.2}"));
            }
        }
        painter.text(
            level_rect.center_bottom() - Vec2::new(0.0, 4.0),
            Align2::CENTER_BOTTOM,
            *level,
            FontId::proportional(14.0),
            Color32::BLACK,
        );
    }

    if let Some(text) = hovered {
        response.on_hover_text(text);
    }
}

// ---------------------------------------------------------------------------
// Hierarchy: source → market event → sentiment counts
// ---------------------------------------------------------------------------

pub fn source_event_sentiment_tree(ui: &mut Ui, rows: &[&Record], colors: &ColorMap) {
    let counts = aggregate_by(
        rows.iter().copied(),
        &[KeyField::Source, KeyField::MarketEvent, KeyField::Sentiment],
        NumericField::TradingVolume,
        Reducer::Count,
    );
    if counts.is_empty() {
        ui.label("No data");
        return;
    }

    let mut tree: BTreeMap<&str, BTreeMap<&str, Vec<(&str, f64)>>> = BTreeMap::new();
    for (key, n) in &counts {
        tree.entry(key[0].as_str())
            .or_default()
            .entry(key[1].as_str())
            .or_default()
            .push((key[2].as_str(), *n));
    }
    let total: f64 = counts.values().sum();

    for (source, events) in &tree {
        let source_n: f64 = events.values().flatten().map(|(_, n)| n).sum();
        egui::CollapsingHeader::new(
            RichText::new(format!("{source}  ({source_n}, {:.1}%)", source_n / total * 100.0)).strong(),
        )
        .id_salt(("source", *source))
        .show(ui, |ui: &mut Ui| {
            for (event, sentiments) in events {
                let event_n: f64 = sentiments.iter().map(|(_, n)| n).sum();
                egui::CollapsingHeader::new(format!("{event}  ({event_n})"))
                    .id_salt(("event", *source, *event))
                    .show(ui, |ui: &mut Ui| {
                        for (sentiment, n) in sentiments {
                            ui.horizontal(|ui: &mut Ui| {
                                ui.label(RichText::new("■").color(colors.color_for(sentiment)));
                                ui.label(format!("{sentiment}: {n}"));
                            });
                        }
                    });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_cover_the_rect_in_proportion() {
        let rect = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(100.0, 50.0));
        let parts = slice_rect(rect, &[1.0, 3.0], true);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].width(), 25.0);
        assert_eq!(parts[1].min.x, 25.0);
        assert_eq!(parts[1].max.x, 100.0);
        assert_eq!(parts[1].height(), 50.0);
    }

    #[test]
    fn zero_weights_give_no_slices() {
        let rect = Rect::from_min_max(Pos2::ZERO, Pos2::new(10.0, 10.0));
        assert!(slice_rect(rect, &[0.0, 0.0], false).is_empty());
    }

    #[test]
    fn wedges_stay_within_a_quarter_turn() {
        let pieces = wedge_pieces(0.0, std::f64::consts::TAU * 0.8);
        assert_eq!(pieces.len(), 4);
        assert!(pieces.iter().all(|p| p[0] == [0.0, 0.0] && p.len() > 2));
    }

    #[test]
    fn date_keys_round_trip_through_day_numbers() {
        let day = iso_day("2025-03-01").unwrap();
        assert_eq!(
            NaiveDate::from_num_days_from_ce_opt(day as i32),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
        assert_eq!(iso_day("not a date"), None);
    }
}
