use anyhow::{Context, Result};
use chrono::Local;
use image::png::PngDecoder;
use printpdf::{
    BuiltinFont, Image, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point,
};

use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use crate::chart::ChartSet;
use crate::report::Report;

const MM_PER_INCH: f64 = 25.4;

/// Page geometry for the composed report.
///
/// All positions are in millimeters from the bottom-left corner of the
/// page, matching the PDF coordinate system. The report layout has gone
/// through several arrangements over time, so everything that places or
/// sizes an element lives here rather than in the drawing code.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Page size in millimeters (width, height).
    pub page_size: (f64, f64),
    /// Left margin for all text and images.
    pub margin: f64,
    /// Baseline of the report title.
    pub title_y: f64,
    /// Baseline of the generation timestamp.
    pub timestamp_y: f64,
    /// Baseline of the grand-total line.
    pub total_y: f64,
    /// Baseline of the top-products table heading.
    pub heading_y: f64,
    /// Baseline of the table's column-header row.
    pub table_header_y: f64,
    /// Baseline of the first table row; subsequent rows step down.
    pub table_first_row_y: f64,
    /// Vertical distance between table rows.
    pub table_row_step: f64,
    /// X position of the amount column.
    pub amount_col_x: f64,
    /// Rendered width of each chart image; height follows the aspect ratio.
    pub chart_width: f64,
    /// Bottom edges of the two stacked charts, monthly trend first.
    pub chart_ys: [f64; 2],
    /// Font sizes in points: title, heading, body, small.
    pub title_size: f64,
    pub heading_size: f64,
    pub body_size: f64,
    pub small_size: f64,
}

impl Default for Layout {
    /// A4 portrait with full-width stacked charts under the summary table.
    fn default() -> Self {
        Self {
            page_size: (210.0, 297.0),
            margin: 20.0,
            title_y: 278.0,
            timestamp_y: 270.0,
            total_y: 260.0,
            heading_y: 250.0,
            table_header_y: 243.0,
            table_first_row_y: 236.0,
            table_row_step: 6.0,
            amount_col_x: 150.0,
            chart_width: 170.0,
            chart_ys: [112.0, 12.0],
            title_size: 20.0,
            heading_size: 13.0,
            body_size: 11.0,
            small_size: 9.0,
        }
    }
}

/// Composes the single-page PDF report and writes it under `out_dir`.
///
/// The page carries the title and generation timestamp, the grand total,
/// the top-products table, and both chart images stacked full-width at the
/// positions given by `layout`. The file is named
/// `sales_report_<YYYY>_<MM>.pdf` from the current local date, and the
/// written path is returned.
///
/// # Errors
///
/// Returns an error if a chart image cannot be read or decoded, or the PDF
/// cannot be written.
pub fn write_pdf(
    report: &Report,
    charts: &ChartSet,
    out_dir: impl AsRef<Path>,
    layout: &Layout,
) -> Result<PathBuf> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let (page_width, page_height) = layout.page_size;
    let (doc, page, layer) =
        PdfDocument::new("Sales Report", Mm(page_width), Mm(page_height), "Page 1");
    let layer = doc.get_page(page).get_layer(layer);
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let now = Local::now();
    layer.use_text(
        "Sales Report",
        layout.title_size,
        Mm(layout.margin),
        Mm(layout.title_y),
        &bold,
    );
    layer.use_text(
        format!("Generated {}", now.format("%Y-%m-%d %H:%M")),
        layout.small_size,
        Mm(layout.margin),
        Mm(layout.timestamp_y),
        &regular,
    );
    layer.use_text(
        format!("Total sales: {}", report.total),
        layout.body_size,
        Mm(layout.margin),
        Mm(layout.total_y),
        &regular,
    );

    draw_products_table(&layer, report, layout, &regular, &bold);

    place_chart(&layer, &charts.monthly_trend, layout, layout.chart_ys[0])?;
    place_chart(&layer, &charts.top_salespeople, layout, layout.chart_ys[1])?;

    let path = out_dir.join(format!("sales_report_{}.pdf", now.format("%Y_%m")));
    let file = File::create(&path).with_context(|| format!("{}", path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .with_context(|| format!("{}", path.display()))?;
    Ok(path)
}

fn draw_products_table(
    layer: &PdfLayerReference,
    report: &Report,
    layout: &Layout,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    layer.use_text(
        "Top Products",
        layout.heading_size,
        Mm(layout.margin),
        Mm(layout.heading_y),
        bold,
    );
    layer.use_text(
        "Product",
        layout.body_size,
        Mm(layout.margin),
        Mm(layout.table_header_y),
        bold,
    );
    layer.use_text(
        "Amount",
        layout.body_size,
        Mm(layout.amount_col_x),
        Mm(layout.table_header_y),
        bold,
    );
    let table_right = layout.page_size.0 - layout.margin;
    layer.set_outline_thickness(0.4);
    horizontal_rule(
        layer,
        layout.margin,
        table_right,
        layout.table_header_y - 2.0,
    );
    for (i, (name, total)) in report.top_products.iter().enumerate() {
        let y = layout.table_first_row_y - layout.table_row_step * i as f64;
        layer.use_text(name.as_str(), layout.body_size, Mm(layout.margin), Mm(y), regular);
        layer.use_text(
            total.to_string(),
            layout.body_size,
            Mm(layout.amount_col_x),
            Mm(y),
            regular,
        );
    }
}

fn horizontal_rule(layer: &PdfLayerReference, x0: f64, x1: f64, y: f64) {
    let rule = Line {
        points: vec![
            (Point::new(Mm(x0), Mm(y)), false),
            (Point::new(Mm(x1), Mm(y)), false),
        ],
        is_closed: false,
        has_fill: false,
        has_stroke: true,
        is_clipping_path: false,
    };
    layer.add_shape(rule);
}

/// Embeds a chart PNG at `bottom_y`, scaled to the layout's chart width.
fn place_chart(
    layer: &PdfLayerReference,
    path: &Path,
    layout: &Layout,
    bottom_y: f64,
) -> Result<()> {
    let file = File::open(path).with_context(|| format!("opening chart image {}", path.display()))?;
    let decoder =
        PngDecoder::new(file).with_context(|| format!("decoding chart image {}", path.display()))?;
    let image = Image::try_from(decoder)
        .with_context(|| format!("embedding chart image {}", path.display()))?;
    // The PDF renders an image at (pixels / dpi) inches, so the dpi that
    // yields the wanted width in millimeters follows from the pixel width.
    let px_width = image.image.width.0 as f64;
    let dpi = px_width * MM_PER_INCH / layout.chart_width;
    image.add_to_layer(
        layer.clone(),
        Some(Mm(layout.margin)),
        Some(Mm(bottom_y)),
        None,
        None,
        None,
        Some(dpi),
    );
    Ok(())
}
