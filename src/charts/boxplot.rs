//! Box plot of a numeric column per level of a category

use plotters::prelude::*;
use polars::prelude::DataFrame;

use super::{chart_err, padded_range, Chart, ChartOptions, FONT, PRIMARY};
use crate::error::{AnalysisError, Result};
use crate::pipeline::{category_labels, category_levels, numeric_values, CategoryColumn, NumericColumn};

/// Values of `value` grouped by the levels of `category`, in level order.
pub fn grouped_values(
    df: &DataFrame,
    category: CategoryColumn,
    value: NumericColumn,
) -> Result<Vec<(String, Vec<f64>)>> {
    let labels = category_labels(df, category)?;
    let values = numeric_values(df, value)?;

    let levels: Vec<String> = match category_levels(category) {
        Some(levels) => levels.into_iter().map(str::to_string).collect(),
        None => {
            let mut observed = labels.clone();
            observed.sort();
            observed.dedup();
            observed
        }
    };

    let mut groups: Vec<(String, Vec<f64>)> = levels.into_iter().map(|l| (l, Vec::new())).collect();
    for (label, v) in labels.iter().zip(values) {
        if let Some((_, bucket)) = groups.iter_mut().find(|(l, _)| l == label) {
            bucket.push(v);
        }
    }
    Ok(groups)
}

/// One box per category level; empty levels keep their slot on the axis.
pub fn box_plot(
    df: &DataFrame,
    category: CategoryColumn,
    value: NumericColumn,
    opts: &ChartOptions,
) -> Result<Chart> {
    let groups = grouped_values(df, category, value)?;
    let all: Vec<f64> = groups.iter().flat_map(|(_, v)| v.iter().copied()).collect();
    if all.is_empty() {
        return Err(AnalysisError::Data(format!(
            "Column '{}' has no values to plot",
            value.column_name()
        )));
    }

    let (lo, hi) = padded_range(&all, 0.05);
    let names: Vec<String> = groups.iter().map(|(l, _)| l.clone()).collect();
    let title = opts.title_or(format!("{} by {}", value.label(), category.label()));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (opts.width, opts.height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&title, (FONT, 22))
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(names[..].into_segmented(), (lo as f32)..(hi as f32))
            .map_err(chart_err)?;

        let level_name = |v: &SegmentValue<&String>| -> String {
            match v {
                SegmentValue::CenterOf(s) | SegmentValue::Exact(s) => s.to_string(),
                SegmentValue::Last => String::new(),
            }
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(category.label())
            .y_desc(value.label())
            .x_labels(names.len())
            .x_label_formatter(&level_name)
            .draw()
            .map_err(chart_err)?;

        let boxes: Vec<_> = names
            .iter()
            .zip(&groups)
            .filter(|(_, (_, values))| !values.is_empty())
            .map(|(name, (_, values))| {
                Boxplot::new_vertical(SegmentValue::CenterOf(name), &Quartiles::new(values.as_slice()))
                    .width(30)
                    .whisker_width(0.5)
                    .style(&PRIMARY)
            })
            .collect();

        chart.draw_series(boxes).map_err(chart_err)?;
        root.present().map_err(chart_err)?;
    }

    Ok(Chart::new(
        format!("boxplot_{}_by_{}", value.column_name(), category.column_name()),
        title,
        svg,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_grouped_values_keep_level_order() {
        let df = df!(
            "sweetness" => ["sweet", "dry", "dry", "medium"],
            "alcohol" => [9.0, 10.0, 11.0, 12.0]
        )
        .unwrap();
        let groups = grouped_values(
            &df,
            CategoryColumn::Sweetness,
            NumericColumn::Measure(crate::pipeline::Measure::Alcohol),
        )
        .unwrap();

        let names: Vec<&str> = groups.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(names, vec!["dry", "medium-dry", "medium", "sweet"]);
        assert_eq!(groups[0].1, vec![10.0, 11.0]);
        assert!(groups[1].1.is_empty());
        assert_eq!(groups[3].1, vec![9.0]);
    }
}
