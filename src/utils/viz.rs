//! Chart rendering for simulation results
//!
//! Renders self-contained SVG files (no plotting dependency): probability
//! curves, theoretical-vs-empirical overlays, per-size bar comparisons, and
//! the attack complexity curve. All output lands under the caller-supplied
//! paths, conventionally `results/graphs/`.

use crate::attack::birthday::{attempts_for_probability, collision_probability};
use crate::attack::simulator::{compare_hash_sizes, ScalingPoint, SimulationResult};
use crate::oracle::get_oracle;
use anyhow::{bail, Result};
use log::info;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;

struct Series {
    label: String,
    color: &'static str,
    points: Vec<(f64, f64)>,
    markers: bool,
}

struct Chart {
    title: String,
    x_label: String,
    y_label: String,
    series: Vec<Series>,
    y_percent: bool,
}

impl Chart {
    fn render(&self) -> Result<String> {
        let all: Vec<(f64, f64)> = self.series.iter().flat_map(|s| s.points.iter().copied()).collect();
        if all.is_empty() {
            bail!("Nothing to plot for chart '{}'", self.title);
        }

        let x_min = all.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let x_max = all.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let y_min = all.iter().map(|p| p.1).fold(f64::INFINITY, f64::min).min(0.0);
        let y_max = all.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let x_span = if x_max > x_min { x_max - x_min } else { 1.0 };
        let y_span = if y_max > y_min { y_max - y_min } else { 1.0 };

        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let to_x = |x: f64| MARGIN_LEFT + (x - x_min) / x_span * plot_w;
        let to_y = |y: f64| MARGIN_TOP + plot_h - (y - y_min) / y_span * plot_h;

        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
        )?;
        writeln!(svg, r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#)?;
        writeln!(
            svg,
            r#"<text x="{}" y="25" text-anchor="middle" font-family="sans-serif" font-size="16">{}</text>"#,
            WIDTH / 2.0,
            self.title
        )?;

        // Grid and tick labels, five divisions each way.
        for i in 0..=5 {
            let frac = i as f64 / 5.0;
            let gx = MARGIN_LEFT + frac * plot_w;
            let gy = MARGIN_TOP + plot_h - frac * plot_h;
            writeln!(
                svg,
                r#"<line x1="{gx:.1}" y1="{MARGIN_TOP}" x2="{gx:.1}" y2="{:.1}" stroke="lightgray"/>"#,
                MARGIN_TOP + plot_h
            )?;
            writeln!(
                svg,
                r#"<line x1="{MARGIN_LEFT}" y1="{gy:.1}" x2="{:.1}" y2="{gy:.1}" stroke="lightgray"/>"#,
                MARGIN_LEFT + plot_w
            )?;
            let x_value = x_min + frac * x_span;
            let y_value = y_min + frac * y_span;
            let y_text = if self.y_percent {
                format!("{:.0}%", y_value * 100.0)
            } else {
                format!("{:.0}", y_value)
            };
            writeln!(
                svg,
                r#"<text x="{gx:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="11">{:.0}</text>"#,
                MARGIN_TOP + plot_h + 18.0,
                x_value
            )?;
            writeln!(
                svg,
                r#"<text x="{:.1}" y="{gy:.1}" text-anchor="end" font-family="sans-serif" font-size="11">{}</text>"#,
                MARGIN_LEFT - 8.0,
                y_text
            )?;
        }

        // Axes.
        writeln!(
            svg,
            r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{:.1}" stroke="black"/>"#,
            MARGIN_TOP + plot_h
        )?;
        writeln!(
            svg,
            r#"<line x1="{MARGIN_LEFT}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black"/>"#,
            MARGIN_TOP + plot_h,
            MARGIN_LEFT + plot_w,
            MARGIN_TOP + plot_h
        )?;
        writeln!(
            svg,
            r#"<text x="{}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="13">{}</text>"#,
            WIDTH / 2.0,
            HEIGHT - 15.0,
            self.x_label
        )?;
        writeln!(
            svg,
            r#"<text x="18" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="13" transform="rotate(-90 18 {:.1})">{}</text>"#,
            HEIGHT / 2.0,
            HEIGHT / 2.0,
            self.y_label
        )?;

        for series in &self.series {
            let path: Vec<String> = series
                .points
                .iter()
                .map(|&(x, y)| format!("{:.1},{:.1}", to_x(x), to_y(y)))
                .collect();
            writeln!(
                svg,
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
                path.join(" "),
                series.color
            )?;
            if series.markers {
                for &(x, y) in &series.points {
                    writeln!(
                        svg,
                        r#"<circle cx="{:.1}" cy="{:.1}" r="4" fill="{}"/>"#,
                        to_x(x),
                        to_y(y),
                        series.color
                    )?;
                }
            }
        }

        // Legend, top-right corner of the plot area.
        for (i, series) in self.series.iter().enumerate() {
            let ly = MARGIN_TOP + 14.0 + i as f64 * 18.0;
            let lx = MARGIN_LEFT + plot_w - 160.0;
            writeln!(
                svg,
                r#"<line x1="{lx:.1}" y1="{ly:.1}" x2="{:.1}" y2="{ly:.1}" stroke="{}" stroke-width="3"/>"#,
                lx + 24.0,
                series.color
            )?;
            writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="12">{}</text>"#,
                lx + 30.0,
                ly + 4.0,
                series.label
            )?;
        }

        writeln!(svg, "</svg>")?;
        Ok(svg)
    }

    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render()?)?;
        info!("Saved plot to {}", path.display());
        Ok(())
    }
}

/// Theoretical collision probability versus sample count for one bit size.
/// Default range runs to `3 * sqrt(N)`, past the 99% point.
pub fn plot_probability_vs_samples(
    bit_size: u32,
    max_samples: Option<u64>,
    output: &Path,
) -> Result<()> {
    let oracle = get_oracle(bit_size)?;
    let space = oracle.output_space();
    let max_samples = max_samples.unwrap_or((3.0 * (space as f64).sqrt()) as u64);
    let step = (max_samples / 100).max(1);

    let points: Vec<(f64, f64)> = (0..=max_samples)
        .step_by(step as usize)
        .map(|n| (n as f64, collision_probability(n, space)))
        .collect();

    Chart {
        title: format!("Birthday Collision Probability, {}-bit Hash", bit_size),
        x_label: "Number of Samples".to_string(),
        y_label: "Collision Probability".to_string(),
        series: vec![Series {
            label: "Theoretical".to_string(),
            color: "#1f5fbf",
            points,
            markers: false,
        }],
        y_percent: true,
    }
    .save(output)
}

/// Scaling-analysis overlay: empirical measurements against the theoretical
/// curve for the same sample counts.
pub fn plot_empirical_vs_theoretical(
    points: &[ScalingPoint],
    bit_size: u32,
    output: &Path,
) -> Result<()> {
    let theoretical = points
        .iter()
        .map(|p| (p.samples as f64, p.theoretical_prob))
        .collect();
    let empirical = points
        .iter()
        .map(|p| (p.samples as f64, p.empirical_prob))
        .collect();

    Chart {
        title: format!("Theoretical vs Empirical, {}-bit Hash", bit_size),
        x_label: "Samples per Trial".to_string(),
        y_label: "Collision Probability".to_string(),
        series: vec![
            Series {
                label: "Theoretical".to_string(),
                color: "#1f5fbf",
                points: theoretical,
                markers: false,
            },
            Series {
                label: "Empirical".to_string(),
                color: "#c0392b",
                points: empirical,
                markers: true,
            },
        ],
        y_percent: true,
    }
    .save(output)
}

/// Collision rates at sqrt(N) samples across hash sizes, theoretical beside
/// empirical.
pub fn plot_hash_size_comparison(
    results: &HashMap<u32, SimulationResult>,
    output: &Path,
) -> Result<()> {
    let mut bit_sizes: Vec<u32> = results.keys().copied().collect();
    bit_sizes.sort_unstable();

    let theoretical = bit_sizes
        .iter()
        .map(|b| (*b as f64, results[b].theoretical_probability))
        .collect();
    let empirical = bit_sizes
        .iter()
        .map(|b| (*b as f64, results[b].collision_rate))
        .collect();

    Chart {
        title: "Collision Rates at sqrt(N) Samples".to_string(),
        x_label: "Hash Output Size (bits)".to_string(),
        y_label: "Collision Probability".to_string(),
        series: vec![
            Series {
                label: "Theoretical".to_string(),
                color: "#1f5fbf",
                points: theoretical,
                markers: true,
            },
            Series {
                label: "Empirical".to_string(),
                color: "#c0392b",
                points: empirical,
                markers: true,
            },
        ],
        y_percent: true,
    }
    .save(output)
}

/// Expected 50%-probability attempt count versus bit size, plotted as log2 so
/// the O(2^(n/2)) growth reads as a straight line.
pub fn plot_attack_complexity(bit_sizes: &[u32], output: &Path) -> Result<()> {
    let mut points = Vec::with_capacity(bit_sizes.len());
    for &bits in bit_sizes {
        let oracle = get_oracle(bits)?;
        let attempts = attempts_for_probability(0.5, oracle.output_space())?;
        points.push((bits as f64, (attempts.max(1) as f64).log2()));
    }

    Chart {
        title: "Birthday Attack Complexity: O(2^(n/2))".to_string(),
        x_label: "Hash Output Size (bits)".to_string(),
        y_label: "log2(Expected Attempts for 50%)".to_string(),
        series: vec![Series {
            label: "Expected attempts".to_string(),
            color: "#1f5fbf",
            points,
            markers: true,
        }],
        y_percent: false,
    }
    .save(output)
}

/// Text summary table over a hash-size comparison, written next to the graphs.
pub fn write_summary_table(
    results: &HashMap<u32, SimulationResult>,
    output: &Path,
) -> Result<String> {
    let mut bit_sizes: Vec<u32> = results.keys().copied().collect();
    bit_sizes.sort_unstable();

    let mut lines = Vec::new();
    lines.push("=".repeat(100));
    lines.push("Birthday Attack Simulation Summary".to_string());
    lines.push("=".repeat(100));
    lines.push(format!(
        "{:<10} {:<22} {:<12} {:<14} {:<14} {:<10}",
        "Bit Size", "Output Space", "sqrt(N)", "Theoretical", "Empirical", "Error"
    ));
    lines.push("-".repeat(100));

    for bits in bit_sizes {
        let result = &results[&bits];
        let sqrt_n = (result.output_space as f64).sqrt() as u64;
        lines.push(format!(
            "{:<10} {:<22} {:<12} {:<14} {:<14} {:<10}",
            bits,
            result.output_space,
            sqrt_n,
            format!("{:.2}%", result.theoretical_probability * 100.0),
            format!("{:.2}%", result.collision_rate * 100.0),
            format!(
                "{:.2}%",
                (result.collision_rate - result.theoretical_probability).abs() * 100.0
            ),
        ));
    }
    lines.push("=".repeat(100));
    lines.push("Note: all probabilities measured at sqrt(N) samples".to_string());

    let table = lines.join("\n");
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, &table)?;
    info!("Saved summary table to {}", output.display());
    Ok(table)
}

/// Generate the complete suite: per-size probability curves, the complexity
/// chart, a cross-size comparison backed by fresh simulations, and the
/// summary table.
pub fn plot_all(bit_sizes: &[u32], num_trials: u64, out_dir: &Path) -> Result<()> {
    info!("Generating all visualizations under {}", out_dir.display());

    for &bits in bit_sizes {
        plot_probability_vs_samples(
            bits,
            None,
            &out_dir.join(format!("probability_{}bit.svg", bits)),
        )?;
    }

    let complexity_sizes: Vec<u32> = (8..40).step_by(2).collect();
    plot_attack_complexity(&complexity_sizes, &out_dir.join("attack_complexity.svg"))?;

    let results = compare_hash_sizes(bit_sizes, num_trials)?;
    plot_hash_size_comparison(&results, &out_dir.join("hash_size_comparison.svg"))?;
    write_summary_table(&results, &out_dir.join("summary_table.txt"))?;

    info!("All visualizations generated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn probability_plot_writes_svg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("probability_16bit.svg");
        plot_probability_vs_samples(16, None, &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("<svg"));
        assert!(contents.contains("polyline"));
        assert!(contents.contains("16-bit"));
    }

    #[test]
    fn complexity_plot_covers_all_sizes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("complexity.svg");
        plot_attack_complexity(&[8, 16, 24, 32], &path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("circle"));
    }

    #[test]
    fn empirical_overlay_has_two_series() {
        let points = vec![
            ScalingPoint {
                samples: 8,
                empirical_prob: 0.1,
                theoretical_prob: 0.12,
                collisions_found: 2,
                trials: 20,
            },
            ScalingPoint {
                samples: 16,
                empirical_prob: 0.4,
                theoretical_prob: 0.39,
                collisions_found: 8,
                trials: 20,
            },
        ];
        let dir = tempdir().unwrap();
        let path = dir.path().join("overlay.svg");
        plot_empirical_vs_theoretical(&points, 8, &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Theoretical"));
        assert!(contents.contains("Empirical"));
    }

    #[test]
    fn summary_table_sorts_ascending() {
        let results = compare_hash_sizes(&[8, 4], 10).unwrap();
        let dir = tempdir().unwrap();
        let table = write_summary_table(&results, &dir.path().join("summary.txt")).unwrap();
        let pos4 = table.find("\n4 ").unwrap();
        let pos8 = table.find("\n8 ").unwrap();
        assert!(pos4 < pos8);
    }
}
