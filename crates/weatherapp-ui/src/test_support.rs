use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use weatherapp_weather::{
    CurrentWeather, DayForecast, Location, WeatherCondition, WeatherData,
};

pub(crate) fn sample_weather(city: &str) -> WeatherData {
    let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
    WeatherData {
        location: Location {
            name: city.to_string(),
            region: None,
            country: Some("Testland".to_string()),
            latitude: 10.0,
            longitude: 20.0,
            timezone: None,
        },
        current: CurrentWeather {
            temperature: 18.5,
            feels_like: 17.0,
            humidity: 60,
            wind_speed: 11.0,
            condition: WeatherCondition::PartlyCloudy,
            observed_at: date.and_hms_opt(14, 0, 0).unwrap(),
        },
        forecast: vec![DayForecast {
            date,
            high: 21.0,
            low: 12.0,
            condition: WeatherCondition::Rain,
            precipitation_chance: 40,
            sunrise: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            sunset: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        }],
        temperature_symbol: "°C".to_string(),
        fetched_at: Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap(),
    }
}
