use crate::{
    calculator::Calculator,
    classify::classify,
    config::Config,
    feed::PriceFeed,
    fetch::PendingFetch,
    model::{Category, NormalizedItem, RarityTier, Wear},
};
use eframe::egui;
use egui::{Color32, Context, FontFamily, FontId, Margin, RichText, Stroke, Vec2, Visuals};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Plot};
use std::sync::Arc;
use std::time::Instant;

const CURRENCIES: [&str; 6] = ["USD", "EUR", "GBP", "PLN", "CNY", "BRL"];

const ACCENT: Color32 = Color32::from_rgb(255, 176, 46);
const MUTED: Color32 = Color32::from_rgb(150, 160, 175);
const HEADER: Color32 = Color32::from_rgb(190, 200, 215);

pub fn set_custom_style(ctx: &Context) {
    // Dark slate market theme with an orange accent
    let mut visuals = Visuals::dark();

    visuals.panel_fill = Color32::from_rgb(17, 20, 26);
    visuals.window_fill = Color32::from_rgb(24, 28, 36);
    visuals.extreme_bg_color = Color32::from_rgb(30, 35, 45);
    visuals.faint_bg_color = Color32::from_rgb(26, 30, 39);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(36, 42, 54);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(60, 68, 84));

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(48, 56, 72);
    visuals.widgets.hovered.bg_stroke = Stroke::new(2.0, ACCENT);

    visuals.widgets.active.bg_fill = Color32::from_rgb(60, 70, 90);
    visuals.widgets.active.bg_stroke = Stroke::new(2.0, Color32::from_rgb(255, 200, 110));

    visuals.selection.bg_fill = Color32::from_rgb(120, 80, 20);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = Margin::same(12);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);
    style.spacing.indent = 16.0;

    style.text_styles.insert(
        egui::TextStyle::Body,
        FontId::new(15.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Heading,
        FontId::new(18.0, FontFamily::Proportional),
    );

    ctx.set_style(style);
}

fn rarity_color(tier: RarityTier) -> Color32 {
    match tier {
        RarityTier::Common => Color32::from_rgb(176, 195, 217),
        RarityTier::Uncommon => Color32::from_rgb(94, 152, 217),
        RarityTier::Rare => Color32::from_rgb(75, 105, 255),
        RarityTier::Mythical => Color32::from_rgb(136, 71, 255),
        RarityTier::Legendary => Color32::from_rgb(211, 44, 230),
        RarityTier::Ancient => Color32::from_rgb(235, 75, 75),
    }
}

pub struct CalculatorApp {
    config: Config,
    feed: Arc<dyn PriceFeed>,
    calculator: Calculator,
    pending: Option<PendingFetch>,
    started: bool,

    // Mirrors the filter query so the text box can edit it in place
    search: String,
}

impl CalculatorApp {
    pub fn new(config: Config, feed: Arc<dyn PriceFeed>) -> Self {
        let calculator = Calculator::new(config.debounce());
        Self {
            config,
            feed,
            calculator,
            pending: None,
            started: false,
            search: String::new(),
        }
    }

    fn start_fetch(&mut self, ctx: &Context) {
        // Replacing the handle cancels any fetch still in flight.
        self.pending = None;
        self.calculator.begin_load();

        let wake_ctx = ctx.clone();
        self.pending = Some(PendingFetch::spawn(
            self.feed.clone(),
            self.config.app_id,
            self.config.currency.clone(),
            move || wake_ctx.request_repaint(),
        ));
    }

    fn poll_fetch(&mut self) {
        let Some(pending) = &self.pending else {
            return;
        };
        if let Some(result) = pending.poll() {
            self.pending = None;
            self.calculator.finish_load(result);
        }
    }

    fn set_currency(&mut self, ctx: &Context, currency: &str) {
        if self.config.currency == currency {
            return;
        }
        self.config.currency = currency.to_string();
        if let Err(err) = self.config.save() {
            tracing::warn!(error = %err, "could not save settings");
        }
        self.start_fetch(ctx);
    }

    fn money(&self, value: f64) -> String {
        format_money(value, &self.config.currency)
    }

    fn show_filters(&mut self, ctx: &Context, ui: &mut egui::Ui) {
        ui.label(RichText::new("🗂 Category").strong());
        ui.horizontal_wrapped(|ui| {
            let current = self.calculator.filters().category;
            if ui.selectable_label(current.is_none(), "All").clicked() {
                self.calculator.set_category(None);
            }
            for category in Category::ALL {
                let selected = current == Some(category);
                if ui.selectable_label(selected, category.label()).clicked() {
                    self.calculator
                        .set_category(if selected { None } else { Some(category) });
                }
            }
        });

        ui.add_space(10.0);

        ui.label(RichText::new("🧪 Wear").strong());
        let current_wear = self.calculator.filters().wear;
        egui::ComboBox::from_id_salt("wear")
            .selected_text(current_wear.map_or("All", |w| w.label()))
            .show_ui(ui, |ui| {
                if ui.selectable_label(current_wear.is_none(), "All").clicked() {
                    self.calculator.set_wear(None);
                }
                for wear in Wear::ALL {
                    if ui
                        .selectable_label(current_wear == Some(wear), wear.label())
                        .clicked()
                    {
                        self.calculator.set_wear(Some(wear));
                    }
                }
            });

        ui.add_space(10.0);
        ui.separator();

        ui.label(RichText::new("💱 Currency").strong());
        let mut chosen = None;
        egui::ComboBox::from_id_salt("currency")
            .selected_text(self.config.currency.as_str())
            .show_ui(ui, |ui| {
                for currency in CURRENCIES {
                    if ui
                        .selectable_label(self.config.currency == currency, currency)
                        .clicked()
                    {
                        chosen = Some(currency);
                    }
                }
            });
        if let Some(currency) = chosen {
            self.set_currency(ctx, currency);
        }

        ui.add_space(10.0);
        ui.separator();

        let can_reset = !self.calculator.filters().is_default();
        if ui
            .add_enabled(
                can_reset,
                egui::Button::new(
                    RichText::new("🔄 Reset Filters").color(Color32::from_rgb(255, 150, 150)),
                ),
            )
            .clicked()
        {
            self.search.clear();
            self.calculator.reset_filters();
        }
    }

    fn show_summary(&self, ui: &mut egui::Ui) {
        let summary = self.calculator.summary();

        ui.label(RichText::new("📊 Summary").strong());
        egui::Grid::new("summary").num_columns(2).show(ui, |ui| {
            ui.label("Listings");
            ui.label(summary.count.to_string());
            ui.end_row();

            ui.label("Mean price");
            ui.label(self.money(summary.mean_market));
            ui.end_row();

            ui.label("Median price");
            ui.label(self.money(summary.median_market));
            ui.end_row();

            ui.label("Std. deviation");
            ui.label(self.money(summary.std_dev_market));
            ui.end_row();

            ui.label("We would pay");
            ui.label(RichText::new(self.money(summary.total_resale)).color(ACCENT));
            ui.end_row();
        });

        ui.add_space(6.0);

        let bars: Vec<Bar> = RarityTier::ALL
            .iter()
            .map(|tier| {
                Bar::new(tier.index() as f64, summary.tier_count(*tier) as f64)
                    .name(tier.label())
                    .fill(rarity_color(*tier))
            })
            .collect();

        Plot::new("rarity_chart")
            .height(140.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show_axes([false, true])
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new("Rarity", bars));
            });
    }

    fn show_table(&self, ui: &mut egui::Ui) {
        let items = self.calculator.visible();

        TableBuilder::new(ui)
            .striped(true)
            .vscroll(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::exact(36.0)) // Icon
            .column(Column::remainder().at_least(220.0).clip(true)) // Item
            .column(Column::exact(130.0)) // Weapon type
            .column(Column::exact(110.0)) // Wear
            .column(Column::exact(110.0)) // Rarity
            .column(Column::exact(110.0)) // Market price
            .column(Column::exact(110.0)) // Resale price
            .column(Column::exact(70.0)) // Link + copy
            .header(32.0, |mut header| {
                header.col(|_| {});
                for title in ["Item", "Type", "Wear", "Rarity", "Market", "We Pay", ""] {
                    header.col(|ui| {
                        ui.heading(RichText::new(title).color(HEADER));
                    });
                }
            })
            .body(|body| {
                body.rows(34.0, items.len(), |mut row| {
                    let item = &items[row.index()];

                    row.col(|ui| {
                        ui.label(RichText::new(item.icon.glyph()).size(18.0))
                            .on_hover_text(item.icon.asset());
                    });

                    row.col(|ui| item_name(ui, item));

                    row.col(|ui| {
                        ui.label(RichText::new(&item.weapon_type).color(MUTED))
                            .on_hover_text(classify(item).label());
                    });

                    row.col(|ui| {
                        ui.label(item.wear.label()).on_hover_text(item.wear.short());
                    });

                    row.col(|ui| {
                        ui.label(
                            RichText::new(item.rarity.label())
                                .color(rarity_color(item.rarity))
                                .strong(),
                        );
                    });

                    row.col(|ui| {
                        ui.label(RichText::new(self.money(item.market_price())).color(MUTED));
                    });

                    row.col(|ui| {
                        ui.label(
                            RichText::new(self.money(item.resale_price()))
                                .color(Color32::from_rgb(130, 230, 140))
                                .strong(),
                        );
                    });

                    row.col(|ui| {
                        ui.hyperlink_to("🔗", &item.market_url)
                            .on_hover_text("View on market");
                        if ui.small_button("📋").on_hover_text("Copy offer").clicked() {
                            ui.ctx().copy_text(format!(
                                "{}\nMarket: {}\nWe pay: {}",
                                item.market_hash_name,
                                self.money(item.market_price()),
                                self.money(item.resale_price())
                            ));
                        }
                    });
                });
            });
    }
}

fn item_name(ui: &mut egui::Ui, item: &NormalizedItem) {
    if item.stat_trak {
        ui.label(
            RichText::new("ST™")
                .color(Color32::from_rgb(207, 106, 50))
                .small()
                .strong(),
        );
    }
    if item.souvenir {
        ui.label(
            RichText::new("SOUVENIR")
                .color(Color32::from_rgb(255, 215, 0))
                .small()
                .strong(),
        );
    }
    ui.label(&item.clean_name);
}

impl eframe::App for CalculatorApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if !self.started {
            self.started = true;
            self.start_fetch(ctx);
        }

        self.poll_fetch();

        let now = Instant::now();
        self.calculator.tick(now);
        if let Some(due) = self.calculator.refresh_due() {
            ctx.request_repaint_after(due.saturating_duration_since(now));
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.heading(
                    RichText::new("🔫 Skin Resale Calculator")
                        .color(ACCENT)
                        .strong()
                        .size(24.0),
                );
            });

            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let reload = ui.add_enabled(
                    !self.calculator.is_loading(),
                    egui::Button::new(RichText::new("⟳ Reload Prices").color(ACCENT).strong())
                        .min_size(Vec2::new(120.0, 32.0)),
                );
                if reload.clicked() {
                    self.start_fetch(ctx);
                }

                ui.separator();

                ui.label(RichText::new("🔎").color(MUTED));
                let search_response = ui.add(
                    egui::TextEdit::singleline(&mut self.search)
                        .hint_text("Search skins...")
                        .desired_width(260.0),
                );
                if search_response.changed() {
                    self.calculator.set_query(self.search.clone());
                }
            });

            ui.add_space(2.0);
        });

        egui::SidePanel::right("filters")
            .min_width(250.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                ui.heading(RichText::new("⚡ Filters").color(ACCENT));
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.show_filters(ctx, ui);
                    ui.add_space(10.0);
                    ui.separator();
                    self.show_summary(ui);
                });
            });

        egui::TopBottomPanel::bottom("reveal").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!(
                        "Showing {} of {} skins",
                        self.calculator.visible().len(),
                        self.calculator.filtered_len()
                    ))
                    .color(MUTED),
                );
                if self.calculator.has_more() && ui.button("⬇ Load more").clicked() {
                    self.calculator.load_more();
                }
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.calculator.is_loading() {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(100.0);
                        ui.spinner();
                        ui.add_space(10.0);
                        ui.label(RichText::new("Loading market prices...").color(MUTED));
                    });
                });
                return;
            }

            if self.calculator.filtered_len() == 0 {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new("🔍").size(60.0).color(MUTED));
                        ui.add_space(10.0);
                        ui.label(RichText::new("No items").size(20.0).color(HEADER));
                        ui.add_space(5.0);
                        let hint = match self.calculator.last_error() {
                            Some(err) => format!("Prices could not be loaded: {}", err),
                            None if self.calculator.catalog_len() == 0 => {
                                "The price feed has no listings right now".to_string()
                            }
                            None => "Try adjusting your search or filter settings".to_string(),
                        };
                        ui.label(RichText::new(hint).color(MUTED));
                    });
                });
                return;
            }

            self.show_table(ui);
        });
    }
}

fn format_money(value: f64, currency: &str) -> String {
    match currency {
        "USD" => format!("${:.2}", value),
        "EUR" => format!("€{:.2}", value),
        "GBP" => format!("£{:.2}", value),
        _ => format!("{:.2} {}", value, currency),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(21.0, "USD"), "$21.00");
        assert_eq!(format_money(109.73, "EUR"), "€109.73");
        assert_eq!(format_money(3.5, "PLN"), "3.50 PLN");
    }
}
