//! Worker survey layouts
//!
//! The full sheet is the field team's Tajik spreadsheet; the condensed
//! document is the Russian printable summary.

use super::{export, int_cell, numbered_headers, opt_cell, slot_headers, ExportOptions, Exportable, TabularDocument};
use crate::catalog::builtin::{EXPERIENCE_GARDEN, EXPERIENCE_VEGETABLES};
use crate::catalog::Locale;
use crate::projection::{flag_label, multi_select_columns, multi_select_joined, split_list, ProjectionMode, Projector};
use crate::survey::{SurveyKind, WorkerSurvey};
use crate::Result;

/// Income is a free comma list; the sheet reserves this many columns for it
pub const INCOME_COLUMNS: usize = 5;

const AREA_UNIT: &str = "сотых";

fn experience_flag(record: &WorkerSurvey, key: &str) -> String {
    let flag = if record.agriculture_experience == key { "Бале" } else { "Не" };
    flag.to_string()
}

fn full_sheet_headers(options: &ExportOptions) -> Vec<String> {
    let catalogs = &options.catalogs;
    let mut headers: Vec<String> = [
        "№",
        "Ноҳия",
        "ҷамоат",
        "қишлоқ",
        "Ному насаб",
        "Соли таваллуд",
        "Телефон",
        "Шумораи умумии аъзоёни оила",
        "кӯдакон",
        "пиронсолон",
        "қобили меҳнат",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();

    headers.extend(numbered_headers("Манбаи асосии даромади оила", INCOME_COLUMNS));
    headers.push(format!("Масоҳати умумии замини наздиҳавлигӣ, {}", AREA_UNIT));
    headers.push("Дар сабзакорӣ таҷрибаи корӣ доред?".to_string());
    headers.extend(slot_headers(&catalogs.seeds, Locale::Tg, AREA_UNIT, |slot| {
        format!("Номи дигар намуди сабзавоти {} (Ном)", slot.get())
    }));
    headers.push("Дар боғбонӣ таҷрибаи корӣ доред?".to_string());
    headers.extend(slot_headers(&catalogs.seedlings, Locale::Tg, AREA_UNIT, |slot| {
        format!("Номи дигар намуди ниҳоли {} (Ном)", slot.get())
    }));
    headers.extend(numbered_headers(
        "Манбаи обёрии ба Шумо дастрасбударо нишон диҳед",
        catalogs.irrigation.len(),
    ));
    headers.extend(
        [
            "Занбӯриасалпарварӣ",
            "Оё шумо анбор доред?",
            "масоҳати анбор, м²",
            "Оё шумо дастрасӣ ба сардхона доред?",
            "Оператор",
            "Рузи иловаи маълумот",
        ]
        .iter()
        .map(|h| h.to_string()),
    );
    headers
}

fn condensed_headers() -> Vec<String> {
    [
        "ID",
        "Дата",
        "Адрес",
        "Согласие",
        "Ф.И.О.",
        "Возраст",
        "Телефон",
        "Семья",
        "Доход",
        "Опыт",
        "Площадь, га",
        "Семена",
        "Саженцы",
        "Орошение",
        "Пчёлы",
        "Склад",
        "Холод.",
        "Создано",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect()
}

/// `rayon, jamoat[, selo]`
fn address(record: &WorkerSurvey) -> String {
    let mut parts = vec![record.rayon.as_str(), record.jamoat.as_str()];
    if let Some(selo) = record.selo.as_deref() {
        parts.push(selo);
    }
    parts.join(", ")
}

fn storage_summary(record: &WorkerSurvey) -> String {
    let facilities = &record.facilities;
    match (facilities.has_storage(), facilities.storage_area_sqm()) {
        (true, Some(area)) if area > 0 => format!("Да, {} м²", area),
        (true, _) => "Да".to_string(),
        (false, _) => "Нет".to_string(),
    }
}

impl Exportable for WorkerSurvey {
    const KIND: SurveyKind = SurveyKind::Worker;

    fn full_sheet(records: &[&Self], options: &ExportOptions) -> Result<TabularDocument> {
        let catalogs = &options.catalogs;
        let seeds = Projector::new(&catalogs.seeds, Locale::Tg);
        let seedlings = Projector::new(&catalogs.seedlings, Locale::Tg);
        let irrigation_width = catalogs.irrigation.len();

        export(
            Self::KIND.title(),
            records.iter().copied(),
            full_sheet_headers(options),
            |n, r| {
                let facilities = &r.facilities;
                let mut row = vec![
                    n.to_string(),
                    r.rayon.clone(),
                    r.jamoat.clone(),
                    opt_cell(r.selo.as_deref()),
                    r.full_name.clone(),
                    int_cell(r.age),
                    r.phone.clone(),
                    int_cell(r.family_count),
                    int_cell(r.children_count),
                    int_cell(r.elderly_count),
                    int_cell(r.able_count),
                ];
                let income = split_list(Some(r.income.as_str()));
                row.extend(multi_select_columns(&income, &catalogs.income, Locale::Tg, INCOME_COLUMNS));
                row.push(opt_cell(r.plot_ha.as_deref()));
                row.push(experience_flag(r, EXPERIENCE_VEGETABLES));
                row.extend(seeds.project(r.seeds.as_ref(), ProjectionMode::FixedColumns));
                row.push(experience_flag(r, EXPERIENCE_GARDEN));
                row.extend(seedlings.project(r.seedlings.as_ref(), ProjectionMode::FixedColumns));
                row.extend(multi_select_columns(
                    &r.irrigation_sources,
                    &catalogs.irrigation,
                    Locale::Tg,
                    irrigation_width,
                ));
                row.push(flag_label(facilities.beekeeping(), Locale::Tg).to_string());
                row.push(flag_label(facilities.has_storage(), Locale::Tg).to_string());
                row.push(facilities.storage_area_sqm().map(int_cell).unwrap_or_default());
                row.push(flag_label(facilities.has_refrigerator(), Locale::Tg).to_string());
                row.push(opt_cell(r.operator.as_deref()));
                row.push(r.created_at.format("%d.%m.%Y %H:%M").to_string());
                row
            },
        )
    }

    fn condensed(records: &[&Self], options: &ExportOptions) -> Result<TabularDocument> {
        let catalogs = &options.catalogs;
        let seeds = Projector::new(&catalogs.seeds, Locale::Ru).with_other_label(options.other_label);
        let seedlings = Projector::new(&catalogs.seedlings, Locale::Ru).with_other_label(options.other_label);

        export(Self::KIND.title(), records.iter().copied(), condensed_headers(), |_, r| {
            let facilities = &r.facilities;
            let income = split_list(Some(r.income.as_str()));
            vec![
                int_cell(r.id),
                r.meeting_date.format("%Y-%m-%d").to_string(),
                address(r),
                flag_label(r.accept, Locale::Ru).to_string(),
                r.full_name.clone(),
                int_cell(r.age),
                r.phone.clone(),
                format!(
                    "всего: {}; дети: {}, пожилые: {}, труд.: {}",
                    r.family_count, r.children_count, r.elderly_count, r.able_count
                ),
                multi_select_joined(&income, &catalogs.income, Locale::Ru),
                catalogs
                    .experience
                    .display(&r.agriculture_experience, Locale::Ru)
                    .to_string(),
                opt_cell(r.plot_ha.as_deref()),
                seeds.flatten(r.seeds.as_ref()),
                seedlings.flatten(r.seedlings.as_ref()),
                multi_select_joined(&r.irrigation_sources, &catalogs.irrigation, Locale::Ru),
                flag_label(facilities.beekeeping(), Locale::Ru).to_string(),
                storage_summary(r),
                flag_label(facilities.has_refrigerator(), Locale::Ru).to_string(),
                r.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
    }
}
