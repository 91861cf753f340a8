// SPDX-License-Identifier: GPL-3.0-only

//! Filter selection bar
//!
//! Rows of labeled buttons, one per filter. The selected filter is shown
//! with the suggested button style.

use crate::app::state::{AppModel, FilterKind, Message};
use crate::constants::ui;
use cosmic::Element;
use cosmic::iced::Length;
use cosmic::widget;

impl AppModel {
    /// Build the filter button grid below the preview.
    pub fn filter_bar(&self) -> Element<'_, Message> {
        let mut rows = widget::column().spacing(ui::FILTER_BAR_SPACING);

        for chunk in FilterKind::ALL.chunks(ui::FILTERS_PER_ROW) {
            let mut row = widget::row().spacing(ui::FILTER_BAR_SPACING);
            for filter in chunk {
                row = row.push(self.filter_button(*filter));
            }
            rows = rows.push(row);
        }

        widget::container(rows).center_x(Length::Fill).into()
    }

    fn filter_button(&self, filter: FilterKind) -> Element<'_, Message> {
        let selected = self.selected_filter == filter;

        let class = if selected {
            cosmic::theme::Button::Suggested
        } else {
            cosmic::theme::Button::Standard
        };

        widget::button::text(filter.label())
            .class(class)
            .on_press(Message::SelectFilter(filter))
            .into()
    }
}
