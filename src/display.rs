use crate::models::seat::row_letter;
use crate::services::seating_chart::{ChartView, SeatMark};

const SCREEN_BANNER: &str = "          S C R E E N";
const SCREEN_RULE: &str = "--------------------------------";

fn marker(mark: SeatMark) -> &'static str {
    match mark {
        SeatMark::Empty => ".",
        SeatMark::Booked => "#",
        SeatMark::Selected => "o",
    }
}

/// Схема зала для консоли: экран сверху, ближний ряд A внизу, номера мест в подвале.
pub fn render(view: &ChartView) -> String {
    let mut lines = vec![SCREEN_BANNER.to_string(), SCREEN_RULE.to_string()];

    for (row_index, row) in view.rows.iter().enumerate().rev() {
        let label = row_letter(row_index).unwrap_or('?');
        let cells: Vec<&str> = row.iter().map(|m| marker(*m)).collect();
        lines.push(format!("{} {}", label, cells.join("  ")));
    }

    let columns = view.rows.first().map_or(0, Vec::len);
    let numbers: Vec<String> = (1..=columns).map(|n| n.to_string()).collect();
    lines.push(format!("  {}", numbers.join("  ")));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
