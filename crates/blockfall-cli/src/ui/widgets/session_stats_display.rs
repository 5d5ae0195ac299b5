use std::{iter, time::Duration};

use blockfall_engine::SessionSnapshot;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

/// Score, play time, level and the line-clear histogram.
pub struct SessionStatsDisplay<'a> {
    snapshot: &'a SessionSnapshot,
    elapsed: Duration,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(snapshot: &'a SessionSnapshot, elapsed: Duration) -> Self {
        Self {
            snapshot,
            elapsed,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

type Value = &'static dyn Fn(&SessionSnapshot, Duration) -> String;

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(Value),
    LabelValue(&'static str, Value),
}

fn format_duration(dur: Duration) -> String {
    format!(
        "{:0}:{:0>2}.{:0>2}",
        dur.as_secs() / 60,
        dur.as_secs() % 60,
        dur.subsec_millis() / 10
    )
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|snapshot, _| snapshot.score.to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(&|_, elapsed| format_duration(elapsed)),
    Row::Empty,
    Row::LabelValue("LEVEL:", &|snapshot, _| snapshot.level.to_string()),
    Row::LabelValue("LINES:", &|snapshot, _| snapshot.lines.to_string()),
    Row::Empty,
    Row::LabelValue("PIECES:", &|snapshot, _| {
        snapshot.completed_pieces.to_string()
    }),
    Row::LabelValue("SINGLES:", &|snapshot, _| snapshot.line_clears[1].to_string()),
    Row::LabelValue("DOUBLES:", &|snapshot, _| snapshot.line_clears[2].to_string()),
    Row::LabelValue("TRIPLES:", &|snapshot, _| snapshot.line_clears[3].to_string()),
    Row::LabelValue("QUADS:", &|snapshot, _| snapshot.line_clears[4].to_string()),
];

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.snapshot, self.elapsed), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.snapshot, self.elapsed), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
