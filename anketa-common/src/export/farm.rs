//! Farm survey layouts (Russian headers)

use super::{export, int_cell, numbered_headers, opt_cell, slot_headers, ExportOptions, Exportable, TabularDocument};
use crate::catalog::{CatalogSet, Locale};
use crate::projection::{flag_label, multi_select_columns, multi_select_joined, ProjectionMode, Projector};
use crate::survey::{FarmSurvey, SurveyKind};
use crate::Result;

const AREA_UNIT: &str = "га";

fn to_headers(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|h| h.to_string()).collect()
}

fn full_sheet_headers(catalogs: &CatalogSet) -> Vec<String> {
    let mut headers = to_headers(&[
        "№",
        "Дата встречи",
        "Район",
        "Джамоат",
        "Село",
        "Согласие",
        "Название ДХ",
        "ФИО руководителя",
        "Возраст рук.",
        "Телефон рук.",
        "Площадь ДХ, га",
        "Опыт",
    ]);
    headers.extend(slot_headers(&catalogs.seeds, Locale::Ru, AREA_UNIT, |slot| {
        format!("Другие семена {} (название)", slot.get())
    }));
    headers.extend(slot_headers(&catalogs.seedlings, Locale::Ru, AREA_UNIT, |slot| {
        format!("Другие саженцы {} (название)", slot.get())
    }));
    headers.extend(to_headers(&["Техника (код)", "Техника (метка)", "Другое (техника)"]));
    headers.extend(numbered_headers("Орошение", catalogs.irrigation.len()));
    headers.extend(to_headers(&[
        "Пчеловодство",
        "Склад (есть?)",
        "Площадь склада, м²",
        "Холод. камера",
        "Подпись",
        "Оператор",
        "Создано",
    ]));
    headers
}

fn condensed_headers() -> Vec<String> {
    to_headers(&[
        "ID",
        "Дата встречи",
        "Район",
        "Джамоат",
        "Село",
        "Согласие",
        "Название ДХ",
        "ФИО руководителя",
        "Возраст рук.",
        "Телефон рук.",
        "Площадь ДХ, га",
        "Опыт",
        "Семена (ключ:площадь)",
        "Саженцы (ключ:площадь)",
        "Техника (код)",
        "Техника (метка)",
        "Другое (техника)",
        "Орошение",
        "Пчеловодство",
        "Склад (есть?)",
        "Площадь склада, м²",
        "Холод. камера",
        "Создано",
    ])
}

impl Exportable for FarmSurvey {
    const KIND: SurveyKind = SurveyKind::Farm;

    fn full_sheet(records: &[&Self], options: &ExportOptions) -> Result<TabularDocument> {
        let catalogs = &options.catalogs;
        let seeds = Projector::new(&catalogs.seeds, Locale::Ru);
        let seedlings = Projector::new(&catalogs.seedlings, Locale::Ru);

        export(
            Self::KIND.title(),
            records.iter().copied(),
            full_sheet_headers(catalogs),
            |n, r| {
                let facilities = &r.facilities;
                let mut row = vec![
                    n.to_string(),
                    r.meeting_date.format("%d.%m.%Y").to_string(),
                    r.rayon.clone(),
                    r.jamoat.clone(),
                    opt_cell(r.selo.as_deref()),
                    flag_label(r.accept, Locale::Ru).to_string(),
                    r.farm_name.clone(),
                    r.leader_full_name.clone(),
                    int_cell(r.leader_age),
                    r.leader_phone.clone(),
                    opt_cell(r.farm_plot_ha.as_deref()),
                    catalogs.experience.display(&r.agriculture_experience, Locale::Ru).to_string(),
                ];
                row.extend(seeds.project(r.seeds.as_ref(), ProjectionMode::FixedColumns));
                row.extend(seedlings.project(r.seedlings.as_ref(), ProjectionMode::FixedColumns));
                row.push(r.equipment_choice.clone());
                row.push(catalogs.equipment.display(&r.equipment_choice, Locale::Ru).to_string());
                row.push(opt_cell(r.equipment_other_text.as_deref()));
                row.extend(multi_select_columns(
                    &r.irrigation_sources,
                    &catalogs.irrigation,
                    Locale::Ru,
                    catalogs.irrigation.len(),
                ));
                row.push(flag_label(facilities.beekeeping(), Locale::Ru).to_string());
                row.push(flag_label(facilities.has_storage(), Locale::Ru).to_string());
                row.push(facilities.storage_area_sqm().map(int_cell).unwrap_or_default());
                row.push(flag_label(facilities.has_refrigerator(), Locale::Ru).to_string());
                row.push(opt_cell(r.signature.as_deref()));
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
            vec![
                int_cell(r.id),
                r.meeting_date.format("%Y-%m-%d").to_string(),
                r.rayon.clone(),
                r.jamoat.clone(),
                opt_cell(r.selo.as_deref()),
                flag_label(r.accept, Locale::Ru).to_string(),
                r.farm_name.clone(),
                r.leader_full_name.clone(),
                int_cell(r.leader_age),
                r.leader_phone.clone(),
                opt_cell(r.farm_plot_ha.as_deref()),
                catalogs.experience.display(&r.agriculture_experience, Locale::Ru).to_string(),
                seeds.flatten(r.seeds.as_ref()),
                seedlings.flatten(r.seedlings.as_ref()),
                r.equipment_choice.clone(),
                catalogs.equipment.display(&r.equipment_choice, Locale::Ru).to_string(),
                opt_cell(r.equipment_other_text.as_deref()),
                multi_select_joined(&r.irrigation_sources, &catalogs.irrigation, Locale::Ru),
                flag_label(facilities.beekeeping(), Locale::Ru).to_string(),
                flag_label(facilities.has_storage(), Locale::Ru).to_string(),
                facilities.storage_area_sqm().map(int_cell).unwrap_or_default(),
                flag_label(facilities.has_refrigerator(), Locale::Ru).to_string(),
                r.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
    }
}
