//! Catalogs shipped with the worker and farm-leader forms

use super::Catalog;

/// Experience key that enables the vegetable (seeds) section
pub const EXPERIENCE_VEGETABLES: &str = "овощеводство";
/// Experience key that enables the garden (seedlings) section
pub const EXPERIENCE_GARDEN: &str = "садоводство";
pub const EXPERIENCE_BEEKEEPING: &str = "пчеловодство";
pub const EXPERIENCE_NONE: &str = "нет опыта";

/// Equipment choice that requires a free-text name
pub const EQUIPMENT_OTHER: &str = "other";

const OTHER_TG: &str = "Дигар";
const OTHER_RU: &str = "Другое";

pub fn seeds() -> Catalog {
    Catalog::new("seeds", 1)
        .entry("tomato", "Помидор", "Помидор")
        .entry("pepper", "Қаламфури булғорӣ", "Болгарский перец")
        .entry("cucumber", "Бодиринг", "Огурец")
        .entry("onion", "Пиёз", "Лук")
        .entry("beet", "Лаблабу", "Свёкла")
        .entry("potato", "Картофель", "Картофель")
        .with_other(OTHER_TG, OTHER_RU, 4)
}

pub fn seedlings() -> Catalog {
    Catalog::new("seedlings", 1)
        .entry("apricot", "Зардолу", "Абрикос")
        .entry("apple", "Себ", "Яблоня")
        .entry("grape", "Ангур", "Виноград")
        .entry("almond", "Бодом", "Миндаль")
        .entry("persimmon", "Хурмо", "Хурма")
        .entry("berries", "Буттамеваҳо", "Ягодные культуры")
        .with_other(OTHER_TG, OTHER_RU, 4)
}

pub fn irrigation() -> Catalog {
    Catalog::new("irrigation", 1)
        .entry("none", "Не", "Нет")
        .entry("well", "Чоҳ", "Скважина")
        .entry("pump", "Насос", "Насос")
        .entry("canal", "Канал / дарё", "Канал / река")
}

pub fn income() -> Catalog {
    Catalog::new("income", 1)
        .entry("agriculture", "Кишоварзӣ", "Сельское хозяйство")
        .entry("seasonal", "Корҳои мавсимӣ", "Сезонные работы")
        .entry("abroad", "Кор дар хориҷа", "Работа за рубежом")
        .entry("pension", "Нафақа", "Пенсия")
}

pub fn experience() -> Catalog {
    Catalog::new("experience", 1)
        .entry(EXPERIENCE_VEGETABLES, "Сабзикорӣ", "Овощеводство")
        .entry(EXPERIENCE_GARDEN, "Боғдорӣ", "Садоводство")
        .entry(EXPERIENCE_BEEKEEPING, "Занбӯриасалпарварӣ", "Пчеловодство")
        .entry(EXPERIENCE_NONE, "Таҷриба надорам", "Нет опыта")
}

pub fn equipment() -> Catalog {
    Catalog::new("equipment", 1)
        .entry("freza", "Фреза", "Фреза")
        .entry("seeder", "Мошини кишт", "Посевная машина")
        .entry("cultivator", "Мотокултиватор", "Мотокультиватор")
        .entry(EQUIPMENT_OTHER, OTHER_TG, OTHER_RU)
}
