use crate::processing::displacement::Displacement;
use crate::processing::geometry::{
    marker_color, render_error_ellipse, render_vector, render_vertical_circle, Coordinate,
};
use crate::records::Provider;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const KML_HEADER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<kml xmlns=\"http://www.opengis.net/kml/2.2\" xmlns:gx=\"http://www.google.com/kml/ext/2.2\" ",
    "xmlns:kml=\"http://www.opengis.net/kml/2.2\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n",
    " <Folder>\n",
);
const KML_FOOTER: &str = " </Folder>\n</kml>\n";
const MARKER_ICON: &str = "https://maps.google.com/mapfiles/kml/paddle/wht-blank.png";
const VECTOR_COLOR: &str = "FFB478FF";
const ELLIPSE_COLOR: &str = "FF000000";

pub const TABLE_HEADER: &str = "Site          Lon          Lat      Delta E      Delta N      Delta V      Sigma E      Sigma N      Sigma V";

/// Rendering options shared by both KML documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOptions {
    pub provider: Provider,
    /// Millimeters per degree.
    pub scale: f64,
    pub marker_scale: f64,
    pub draw_ellipses: bool,
    pub reference: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            provider: Provider::Jpl,
            scale: 320.0,
            marker_scale: 0.5,
            draw_ellipses: false,
            reference: None,
        }
    }
}

/// Rendered documents plus the rows they were built from.
#[derive(Debug, Clone)]
pub struct Report {
    pub horizontal: String,
    pub vertical: String,
    pub table: String,
    pub rows: Vec<Displacement>,
}

impl Report {
    pub fn rows_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.rows)
    }
}

/// KML document with a single top-level folder of placemarks.
pub struct KmlDocument {
    body: String,
}

impl KmlDocument {
    pub fn new() -> Self {
        Self {
            body: String::from(KML_HEADER),
        }
    }

    pub fn marker(&mut self, disp: &Displacement, options: &ReportOptions) {
        let is_reference = options.reference.as_deref() == Some(disp.station.as_str());
        let page = options.provider.station_page_url(&disp.station);
        let plot = options.provider.station_plot_url(&disp.station);
        let body = &mut self.body;

        let _ = writeln!(body, "  <Placemark>");
        let _ = writeln!(body, "   <description><![CDATA[");
        let _ = writeln!(body, "    <a href=\"{}\">", page);
        let _ = writeln!(
            body,
            "     <img src=\"{}\" width=\"300\" height=\"300\">",
            plot
        );
        let _ = writeln!(body, "    </a>");
        let _ = writeln!(body, "   ]]></description>");
        let _ = writeln!(body, "   <Style><IconStyle>");
        let _ = writeln!(body, "    <color>{}</color>", marker_color(is_reference));
        let _ = writeln!(body, "    <scale>{:.6}</scale>", options.marker_scale);
        let _ = writeln!(body, "    <Icon><href>{}</href></Icon>", MARKER_ICON);
        let _ = writeln!(body, "   </IconStyle></Style>");
        let _ = writeln!(body, "   <Point>");
        let _ = writeln!(body, "    <coordinates>");
        let _ = writeln!(body, "     {:.6},{:.6},0", disp.lon, disp.lat);
        let _ = writeln!(body, "    </coordinates>");
        let _ = writeln!(body, "   </Point>");
        let _ = writeln!(body, "  </Placemark>");
    }

    pub fn vector(&mut self, disp: &Displacement, scale: f64) {
        let segment = render_vector(disp.lon, disp.lat, disp.delta_east, disp.delta_north, scale);
        let body = &mut self.body;

        let _ = writeln!(body, "  <Placemark>");
        let _ = writeln!(body, "   <Style><LineStyle>");
        let _ = writeln!(body, "    <color>{}</color>", VECTOR_COLOR);
        let _ = writeln!(body, "    <width>2</width>");
        let _ = writeln!(body, "   </LineStyle></Style>");
        let _ = writeln!(body, "   <LineString>");
        let _ = writeln!(body, "   <coordinates>");
        for point in [segment.start, segment.end] {
            let _ = writeln!(body, "   {:.6},{:.6},0", point.lon, point.lat);
        }
        let _ = writeln!(body, "    </coordinates>");
        let _ = writeln!(body, "   </LineString>");
        let _ = writeln!(body, "  </Placemark>");
    }

    pub fn error_ellipse(&mut self, disp: &Displacement, scale: f64) {
        let ring = render_error_ellipse(
            disp.lon,
            disp.lat,
            disp.delta_east,
            disp.delta_north,
            disp.sigma_east,
            disp.sigma_north,
            scale,
            0.0,
        );
        self.polygon(&ring, ELLIPSE_COLOR, ELLIPSE_COLOR, 2, false);
    }

    pub fn vertical_circle(&mut self, disp: &Displacement, scale: f64) {
        let circle = render_vertical_circle(disp.lon, disp.lat, disp.delta_up, scale);
        self.polygon(
            &circle.ring,
            circle.sense.line_color(),
            circle.sense.fill_color(),
            1,
            true,
        );
    }

    fn polygon(&mut self, ring: &[Coordinate], line: &str, fill: &str, width: u32, filled: bool) {
        let body = &mut self.body;
        let _ = writeln!(body, "  <Placemark>");
        let _ = writeln!(body, "   <Style>");
        let _ = writeln!(body, "    <LineStyle>");
        let _ = writeln!(body, "     <color>{}</color>", line);
        let _ = writeln!(body, "     <width>{}</width>", width);
        let _ = writeln!(body, "    </LineStyle>");
        let _ = writeln!(body, "    <PolyStyle>");
        let _ = writeln!(body, "     <color>{}</color>", fill);
        let _ = writeln!(body, "     <fill>{}</fill>", u8::from(filled));
        let _ = writeln!(body, "    </PolyStyle>");
        let _ = writeln!(body, "   </Style>");
        let _ = writeln!(body, "   <Polygon>");
        let _ = writeln!(body, "    <outerBoundaryIs>");
        let _ = writeln!(body, "     <LinearRing>");
        let _ = writeln!(body, "      <coordinates>");
        for point in ring {
            let _ = writeln!(body, "      {:.6},{:.6},0", point.lon, point.lat);
        }
        let _ = writeln!(body, "      </coordinates>");
        let _ = writeln!(body, "     </LinearRing>");
        let _ = writeln!(body, "    </outerBoundaryIs>");
        let _ = writeln!(body, "   </Polygon>");
        let _ = writeln!(body, "  </Placemark>");
    }

    pub fn finish(mut self) -> String {
        self.body.push_str(KML_FOOTER);
        self.body
    }
}

impl Default for KmlDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// One fixed-width table row, every number at six decimals.
pub fn format_row(disp: &Displacement) -> String {
    format!(
        "{} {:12.6} {:12.6} {:12.6} {:12.6} {:12.6} {:12.6} {:12.6} {:12.6}",
        disp.station,
        disp.lon,
        disp.lat,
        disp.delta_east,
        disp.delta_north,
        disp.delta_up,
        disp.sigma_east,
        disp.sigma_north,
        disp.sigma_up
    )
}

/// Renders the horizontal, vertical and table documents in input order.
pub fn write_report(displacements: &[Displacement], options: &ReportOptions) -> Report {
    let mut horizontal = KmlDocument::new();
    let mut vertical = KmlDocument::new();
    let mut table = String::with_capacity(TABLE_HEADER.len() * (displacements.len() + 1));
    table.push_str(TABLE_HEADER);
    table.push('\n');

    for disp in displacements {
        horizontal.marker(disp, options);
        vertical.marker(disp, options);
        horizontal.vector(disp, options.scale);
        if options.draw_ellipses {
            horizontal.error_ellipse(disp, options.scale);
        }
        vertical.vertical_circle(disp, options.scale);
        table.push_str(&format_row(disp));
        table.push('\n');
    }

    Report {
        horizontal: horizontal.finish(),
        vertical: vertical.finish(),
        table,
        rows: displacements.to_vec(),
    }
}
