//! Rendering of forecasts into chat messages (Telegram HTML markup).

use std::fmt::Write as _;

use serde_json::Number;

use crate::{
    model::{CurrentWeather, DailyForecast, WeatherResult},
    registry::CityRegistry,
};

/// Number of forecast days shown in a reply.
pub const FORECAST_DAYS: usize = 7;

const HOT_FROM_C: f64 = 25.0;
const COLD_UP_TO_C: f64 = 5.0;
const WINDY_ABOVE: f64 = 10.0;

const NO_CURRENT_DATA: &str = "Нет данных о текущей погоде.\n\n";
const MISSING_VALUE: &str = "н/д";

/// Weather category selecting a set of reaction phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Hot,
    Cold,
    Windy,
    Normal,
}

impl Bucket {
    /// Classify current conditions. Checks are ordered: heat wins over cold, cold over wind.
    pub fn classify(temperature_c: f64, wind_speed: f64) -> Self {
        if temperature_c >= HOT_FROM_C {
            Bucket::Hot
        } else if temperature_c <= COLD_UP_TO_C {
            Bucket::Cold
        } else if wind_speed > WINDY_ABOVE {
            Bucket::Windy
        } else {
            Bucket::Normal
        }
    }
}

/// Source of randomness for phrase selection.
pub trait PhrasePicker {
    /// Return an index in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

impl<R: rand::Rng + ?Sized> PhrasePicker for R {
    fn pick_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Canned reactions appended to the current weather.
#[derive(Debug, Clone)]
pub struct ReactionCatalog {
    hot: Vec<String>,
    cold: Vec<String>,
    windy: Vec<String>,
    normal: Vec<String>,
}

impl ReactionCatalog {
    pub fn phrases(&self, bucket: Bucket) -> &[String] {
        match bucket {
            Bucket::Hot => &self.hot,
            Bucket::Cold => &self.cold,
            Bucket::Windy => &self.windy,
            Bucket::Normal => &self.normal,
        }
    }

    /// Choose one phrase from the bucket; an empty bucket yields an empty reaction.
    pub fn pick<P: PhrasePicker + ?Sized>(&self, bucket: Bucket, picker: &mut P) -> &str {
        let phrases = self.phrases(bucket);
        if phrases.is_empty() {
            return "";
        }
        let idx = picker.pick_index(phrases.len()).min(phrases.len() - 1);
        &phrases[idx]
    }
}

impl Default for ReactionCatalog {
    fn default() -> Self {
        fn owned(phrases: &[&str]) -> Vec<String> {
            phrases.iter().map(|p| (*p).to_string()).collect()
        }

        Self {
            hot: owned(&[
                "Жарковато! Пора доставать плавки и искать ближайший бассейн! 🏖",
                "Солнце жжет! Не забудь защитный крем, чтобы не превратиться в картошку-фри. 🌞",
                "Настоящая духота! Может, лучше спрятаться в холодильнике? ❄️",
            ]),
            cold: owned(&[
                "Холодно, как в сердце твоего бывшего! 🧊",
                "Минус на улице, плюс к желанию сидеть дома под пледом! 🥶",
                "Где твой теплый чай и толстый свитер? Сейчас самое время! 🍵",
            ]),
            windy: owned(&[
                "Ветер такой, что можно бесплатно испытать эффект парашюта! 💨",
                "Пора привязывать шапку, чтобы она не улетела в другой город! 🎩",
                "Хочешь бесплатную укладку? Просто выйди на улицу! 🌪",
            ]),
            normal: owned(&[
                "Погода вроде нормальная! Можно спокойно гулять. 😎",
                "Сегодня идеальный день, чтобы не париться о погоде! 😏",
                "Всё спокойно! Даже синоптики не жалуются. 😆",
            ]),
        }
    }
}

/// Render a weather lookup as a chat message.
///
/// Errors render as their reason. Otherwise the layout is: current-weather block,
/// reaction, blank line, forecast block. Existing readers depend on this exact shape.
pub fn format_weather<P: PhrasePicker + ?Sized>(
    result: &WeatherResult,
    catalog: &ReactionCatalog,
    picker: &mut P,
) -> String {
    let forecast = match result {
        Ok(forecast) => forecast,
        Err(err) => return err.to_string(),
    };

    let (current_block, reaction) = match &forecast.current_weather {
        Some(current) => {
            let bucket = Bucket::classify(current.temperature_c(), current.wind_speed());
            (render_current(current), catalog.pick(bucket, picker))
        }
        None => (NO_CURRENT_DATA.to_string(), ""),
    };

    let forecast_block = forecast
        .daily
        .as_ref()
        .map(render_daily)
        .unwrap_or_default();

    format!("{current_block}{reaction}\n\n{forecast_block}")
}

/// Reply to `/start`: invitation listing every supported city.
pub fn format_greeting(registry: &CityRegistry) -> String {
    let cities: Vec<&str> = registry.names().collect();
    format!(
        "Привет! Отправь название города из следующего списка: {}",
        cities.join(", ")
    )
}

fn render_current(current: &CurrentWeather) -> String {
    format!(
        "🌍 <b>Текущая погода:</b>\n🌡 Температура: {}°C\n💨 Ветер: {} м/с\n\n",
        current.temperature, current.windspeed
    )
}

fn render_daily(daily: &DailyForecast) -> String {
    let mut out = String::from("📅 <b>Прогноз на неделю:</b>\n");
    for day in daily.entries().take(FORECAST_DAYS) {
        let _ = writeln!(
            out,
            "{}: 🌡 {}°C - {}°C, ☔ Осадки: {} мм",
            day.date,
            show(day.temp_min),
            show(day.temp_max),
            show(day.precipitation),
        );
    }
    out
}

fn show(value: Option<&Number>) -> String {
    value.map_or_else(|| MISSING_VALUE.to_string(), Number::to_string)
}
