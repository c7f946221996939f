use std::f64::consts::PI;
use std::fmt::Write;

const PALETTE: [&str; 10] = [
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
    "#ff97ff", "#fecb52",
];

const PIE_WIDTH: f64 = 720.0;
const PIE_HEIGHT: f64 = 480.0;
const PIE_RADIUS: f64 = 200.0;

const BAR_WIDTH: f64 = 640.0;
const BAR_HEIGHT: f64 = 400.0;
const MARGIN: f64 = 50.0;

fn color(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()]
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn open_svg(svg: &mut String, width: f64, height: f64) {
    let _ = writeln!(
        svg,
        r#"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" xmlns="http://www.w3.org/2000/svg" font-family="sans-serif" font-size="12">"#
    );
}

/// Wedges start at 12 o'clock and run clockwise. Values that are not
/// positive take no space.
pub(crate) fn render_pie(labels: &[String], values: &[f64]) -> String {
    let mut svg = String::new();
    open_svg(&mut svg, PIE_WIDTH, PIE_HEIGHT);

    let (cx, cy) = (PIE_HEIGHT / 2.0, PIE_HEIGHT / 2.0);
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    let positive = values.iter().filter(|v| **v > 0.0).count();

    if total <= 0.0 {
        let _ = writeln!(
            svg,
            r##"<circle cx="{cx}" cy="{cy}" r="{PIE_RADIUS}" fill="none" stroke="#cccccc"/>"##
        );
    } else {
        let mut angle = -PI / 2.0;
        for (i, (label, value)) in labels.iter().zip(values).enumerate() {
            if *value <= 0.0 {
                continue;
            }
            let share = value / total;
            let title = format!("{}: {} ({:.1}%)", escape_xml(label), value, share * 100.0);

            if positive == 1 {
                let _ = writeln!(
                    svg,
                    r#"<circle class="wedge" cx="{cx}" cy="{cy}" r="{PIE_RADIUS}" fill="{}"><title>{title}</title></circle>"#,
                    color(i)
                );
                continue;
            }

            let sweep = share * 2.0 * PI;
            let (x1, y1) = (cx + PIE_RADIUS * angle.cos(), cy + PIE_RADIUS * angle.sin());
            angle += sweep;
            let (x2, y2) = (cx + PIE_RADIUS * angle.cos(), cy + PIE_RADIUS * angle.sin());
            let large_arc = if sweep > PI { 1 } else { 0 };
            let _ = writeln!(
                svg,
                r#"<path class="wedge" d="M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {PIE_RADIUS} {PIE_RADIUS} 0 {large_arc} 1 {x2:.2} {y2:.2} Z" fill="{}" stroke="white"><title>{title}</title></path>"#,
                color(i)
            );
        }
    }

    // Legend
    let legend_x = PIE_HEIGHT + 20.0;
    for (i, label) in labels.iter().enumerate() {
        let y = 40.0 + i as f64 * 20.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{legend_x}" y="{}" width="12" height="12" fill="{}"/>"#,
            y - 10.0,
            color(i)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{y}">{}</text>"#,
            legend_x + 18.0,
            escape_xml(label)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Bars grow up from zero for positive values and down for negative ones.
pub(crate) fn render_bar(labels: &[String], values: &[f64]) -> String {
    let mut svg = String::new();
    open_svg(&mut svg, BAR_WIDTH, BAR_HEIGHT);

    let plot_w = BAR_WIDTH - 2.0 * MARGIN;
    let plot_h = BAR_HEIGHT - 2.0 * MARGIN;
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    let min = values.iter().copied().fold(0.0_f64, f64::min);
    let range = if max - min > 0.0 { max - min } else { 1.0 };
    let baseline = MARGIN + plot_h * (max / range);

    let _ = writeln!(
        svg,
        r##"<line x1="{MARGIN}" y1="{baseline:.2}" x2="{}" y2="{baseline:.2}" stroke="#444444"/>"##,
        MARGIN + plot_w
    );

    if !values.is_empty() {
        let slot = plot_w / values.len() as f64;
        for (i, (label, value)) in labels.iter().zip(values).enumerate() {
            let height = value.abs() / range * plot_h;
            let x = MARGIN + i as f64 * slot + slot * 0.1;
            let y = if *value >= 0.0 { baseline - height } else { baseline };
            let _ = writeln!(
                svg,
                r#"<rect class="bar" x="{x:.2}" y="{y:.2}" width="{:.2}" height="{height:.2}" fill="{}"><title>{}: {}</title></rect>"#,
                slot * 0.8,
                color(0),
                escape_xml(label),
                value
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
                MARGIN + i as f64 * slot + slot / 2.0,
                BAR_HEIGHT - MARGIN / 2.0,
                escape_xml(label)
            );
        }
    }

    svg.push_str("</svg>\n");
    svg
}
