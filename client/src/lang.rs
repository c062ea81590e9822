#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Georgian,
    English,
}

impl Language {
    pub fn toggle(self) -> Self {
        match self {
            Language::Georgian => Language::English,
            Language::English => Language::Georgian,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::Georgian => "ქართული",
            Language::English => "English",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Text {
    Title,
    TimePeriod,
    From,
    To,
    Result,
    OfficialRate,
    PersonalRate,
    RangeOrder,
    Error,
    GroupName,
    GroupOrSubgroup,
    Monthly,
    Annual,
    OfficialWeight,
    PersonalWeight,
    AverageMonthly,
    PriceChange,
    Total,
    IndexTrend,
    TodaysDate,
    InflationPeriod,
    ReportSaved,
}

pub fn tr(lang: Language, text: Text) -> &'static str {
    use Language::*;
    use Text::*;
    match (text, lang) {
        (Title, Georgian) => "პერსონალური ინფლაციის კალკულატორი",
        (Title, English) => "Personal Inflation Calculator",
        (TimePeriod, Georgian) => "დროის პერიოდი:",
        (TimePeriod, English) => "Time Period:",
        (From, Georgian) => "საწყისი:",
        (From, English) => "From:",
        (To, Georgian) => "საბოლოო:",
        (To, English) => "To:",
        (Result, Georgian) => "შედეგი:",
        (Result, English) => "Result:",
        (OfficialRate, Georgian) => "ოფიციალური ინფლაციის მაჩვენებელი:",
        (OfficialRate, English) => "Official Inflation Rate:",
        (PersonalRate, Georgian) => "პერსონალური ინფლაციის მაჩვენებელი:",
        (PersonalRate, English) => "Personal Inflation Rate:",
        (RangeOrder, Georgian) => "საბოლოო პერიოდი უნდა აღემატებოდეს საწყის პერიოდს.",
        (RangeOrder, English) => "The end period must exceed the start period.",
        (Error, Georgian) => "შეცდომა",
        (Error, English) => "Error",
        (GroupName, Georgian) => "ჯგუფის დასახელება",
        (GroupName, English) => "Group Name",
        (GroupOrSubgroup, Georgian) => "ჯგუფი / ქვეჯგუფი",
        (GroupOrSubgroup, English) => "Group / Subgroup",
        (Monthly, Georgian) => "პერსონალური ყოველთვიური ხარჯი (₾)",
        (Monthly, English) => "Monthly (₾)",
        (Annual, Georgian) => "პერსონალური ყოველწლიური ხარჯი (₾)",
        (Annual, English) => "Annual (₾)",
        (OfficialWeight, Georgian) => "ოფიციალური წონა",
        (OfficialWeight, English) => "Official Weight",
        (PersonalWeight, Georgian) => "პერსონალური წონა",
        (PersonalWeight, English) => "Personal Weight",
        (AverageMonthly, Georgian) => "საშუალო ყოველთვიური ხარჯი (₾)",
        (AverageMonthly, English) => "Avg. monthly (₾)",
        (PriceChange, Georgian) => "ფასების ცვლილება (%)",
        (PriceChange, English) => "Price change (%)",
        (Total, Georgian) => "ჯამი",
        (Total, English) => "Total",
        (IndexTrend, Georgian) => "ფასების ინდექსი",
        (IndexTrend, English) => "Price index",
        (TodaysDate, Georgian) => "დღევანდელი თარიღი:",
        (TodaysDate, English) => "Today's Date:",
        (InflationPeriod, Georgian) => "ინფლაციის პერიოდი:",
        (InflationPeriod, English) => "Inflation Period:",
        (ReportSaved, Georgian) => "ანგარიში შენახულია:",
        (ReportSaved, English) => "Report saved:",
    }
}
