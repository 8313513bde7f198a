use chrono::{NaiveDate, NaiveTime};
use zmanim::{
    compute_shabbat_window, derive_all, resolve_schedule, Catalog, Location, PrayerDefinition,
    PrayerTime, Recurrence, ShabbatConventions, TimeMode,
};

fn main() -> zmanim::Result<()> {
    let location = Location::with_zone_name(31.7650511, 35.1746302, 0.0, "Asia/Jerusalem")?;
    let date = NaiveDate::from_ymd_opt(2025, 9, 19).expect("valid date");
    let catalog = Catalog::standard();

    let table = derive_all(&location, date, &catalog);
    println!("{} zmanim for {date} (catalog {})", table.len(), table.catalog_version());
    for name in [
        "alos_16_1_degrees",
        "sunrise",
        "sof_zman_shma_mga",
        "sof_zman_shma_gra",
        "chatzos",
        "plag_hamincha_gra",
        "sunset",
        "tzais",
    ] {
        match table.local(name) {
            Some(time) => println!("  {name:<22} {}", time.format("%H:%M:%S")),
            None => println!("  {name:<22} unreachable"),
        }
    }

    let prayers = [
        PrayerDefinition::new(
            "shacharit",
            "Shacharit",
            TimeMode::Fixed {
                time: NaiveTime::from_hms_opt(6, 45, 0).expect("valid time"),
            },
        ),
        PrayerDefinition::new(
            "mincha",
            "Mincha",
            TimeMode::ZmanBased {
                zman: "sunset".into(),
                offset_minutes: -15,
            },
        ),
        PrayerDefinition::new(
            "kabbalat_shabbat",
            "Kabbalat Shabbat",
            TimeMode::ZmanBased {
                zman: "sunset".into(),
                offset_minutes: 10,
            },
        )
        .with_recurrence(Recurrence::on([5])),
    ];
    println!("\nSchedule:");
    for prayer in resolve_schedule(date, &prayers, &table) {
        match prayer.time {
            PrayerTime::Scheduled(time) => println!("  {:<18} {}", prayer.name, time.format("%H:%M")),
            PrayerTime::Unreachable => println!("  {:<18} unreachable", prayer.name),
        }
    }

    let window = compute_shabbat_window(
        &location,
        date,
        &ShabbatConventions::default(),
        Some("Nitzavim".into()),
    )?;
    println!("\nShabbat {}", window.parasha().unwrap_or("-"));
    for (minutes, _) in window.candle_lighting_times() {
        if let Some(time) = window.candle_lighting_local(minutes) {
            println!("  candle lighting ({minutes} min) {}", time.format("%H:%M"));
        }
    }
    for (minutes, _) in window.havdalah_times() {
        if let Some(time) = window.havdalah_local(minutes) {
            println!("  havdalah ({minutes} min) {}", time.format("%H:%M"));
        }
    }
    if let Some(time) = window.rabbeinu_tam_local() {
        println!("  havdalah (Rabbeinu Tam) {}", time.format("%H:%M"));
    }
    Ok(())
}
