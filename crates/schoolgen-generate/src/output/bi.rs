//! Dimension and fact tables for the BI layer.
//!
//! Revenue and expenses share `fact_financeiro.csv`, tagged by `tipo`.
//! Resource metrics are generated in long form and pivoted here to one wide
//! row per (unit, month).

use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use crate::dataset::Dataset;
use crate::errors::GenerationError;
use crate::model::TableReport;
use crate::output::write_table;
use crate::records::{MetricKind, MetricSample, MetricValue};
use crate::variant::SchemaVariant;

pub const STUDENTS_FILE: &str = "dim_alunos.csv";
pub const ACADEMIC_FILE: &str = "fact_academico.csv";
pub const FINANCE_FILE: &str = "fact_financeiro.csv";
pub const TICKETS_FILE: &str = "fact_operacional_tickets.csv";
pub const RESOURCES_FILE: &str = "fact_recursos_consumo.csv";
pub const SURVEY_FILE: &str = "fact_pesquisa_nps.csv";

pub const TABLE_FILES: &[&str] = &[
    STUDENTS_FILE,
    ACADEMIC_FILE,
    FINANCE_FILE,
    TICKETS_FILE,
    RESOURCES_FILE,
    SURVEY_FILE,
];

pub const REVENUE_TAG: &str = "Receita";
pub const EXPENSE_TAG: &str = "Despesa";
const TUITION_CATEGORY: &str = "Mensalidade";

#[derive(Debug, Serialize)]
pub struct DimAlunoRow<'a> {
    pub id: Uuid,
    pub nome_completo: &'a str,
    pub data_nascimento: NaiveDate,
    pub genero: &'a str,
    pub cor_raca: &'a str,
    pub unidade: &'a str,
    pub segmento: &'a str,
    pub turma: &'a str,
    pub status_matricula: &'a str,
    pub data_matricula: NaiveDate,
    pub data_evasao: Option<NaiveDate>,
    pub bolsista: bool,
    pub possui_irmaos: bool,
    pub renda_familiar_sm: &'a str,
    pub bairro: &'a str,
    pub cidade: &'a str,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct FactAcademicoRow<'a> {
    pub id: Uuid,
    pub aluno_id: Uuid,
    pub disciplina: &'a str,
    pub bimestre: u8,
    pub ano: i32,
    pub nota_bimestral: f64,
    pub faltas: u32,
    pub percentual_presenca: f64,
    pub taxa_entrega_atividades: f64,
}

#[derive(Debug, Serialize)]
pub struct FactFinanceiroRow<'a> {
    pub id: Uuid,
    pub aluno_id: Option<Uuid>,
    pub tipo: &'a str,
    pub categoria: &'a str,
    pub valor: f64,
    pub data_vencimento: NaiveDate,
    pub data_pagamento: Option<NaiveDate>,
    pub status: &'a str,
    pub mes_referencia: NaiveDate,
    pub ano_referencia: i32,
}

#[derive(Debug, Serialize)]
pub struct FactTicketRow<'a> {
    pub id: Uuid,
    pub unidade: &'a str,
    pub setor: &'a str,
    pub assunto: &'a str,
    pub prioridade: &'a str,
    pub status: &'a str,
    pub data_abertura: NaiveDateTime,
    pub data_resolucao: Option<NaiveDateTime>,
    pub horas_ate_resolucao: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactRecursosRow {
    pub id: Uuid,
    pub unidade: &'static str,
    pub mes_referencia: NaiveDate,
    pub custo_impressao: Option<MetricValue>,
    pub consumo_energia_kwh: Option<MetricValue>,
    pub consumo_agua_m3: Option<MetricValue>,
    pub taxa_desperdicio_alimento: Option<MetricValue>,
    pub refeicoes_servidas: Option<MetricValue>,
    pub custo_medio_refeicao: Option<MetricValue>,
    pub absenteismo_docente: Option<MetricValue>,
}

impl FactRecursosRow {
    fn new(sample: &MetricSample) -> Self {
        Self {
            id: sample.id,
            unidade: sample.unit,
            mes_referencia: sample.month,
            custo_impressao: None,
            consumo_energia_kwh: None,
            consumo_agua_m3: None,
            taxa_desperdicio_alimento: None,
            refeicoes_servidas: None,
            custo_medio_refeicao: None,
            absenteismo_docente: None,
        }
    }

    fn set(&mut self, kind: MetricKind, value: MetricValue) {
        let slot = match kind {
            MetricKind::PrintingCost => &mut self.custo_impressao,
            MetricKind::EnergyConsumption => &mut self.consumo_energia_kwh,
            MetricKind::WaterConsumption => &mut self.consumo_agua_m3,
            MetricKind::FoodWasteRate => &mut self.taxa_desperdicio_alimento,
            MetricKind::MealsServed => &mut self.refeicoes_servidas,
            MetricKind::MealCost => &mut self.custo_medio_refeicao,
            MetricKind::TeacherAbsenteeism => &mut self.absenteismo_docente,
            MetricKind::Nps | MetricKind::HealthScore | MetricKind::Uptime => return,
        };
        *slot = Some(value);
    }
}

#[derive(Debug, Serialize)]
pub struct FactNpsRow<'a> {
    pub id: Uuid,
    pub aluno_id: Uuid,
    pub data_pesquisa: NaiveDate,
    pub nota_nps: u8,
    pub health_score_familia: u8,
    pub comentario: &'a str,
}

/// Fold consecutive samples of the same (unit, month) into one wide row.
///
/// The row takes the id of its first sample.
pub fn pivot_resources(samples: &[MetricSample]) -> Vec<FactRecursosRow> {
    let mut rows: Vec<FactRecursosRow> = Vec::new();
    for sample in samples {
        let same_group = rows
            .last()
            .is_some_and(|row| row.unidade == sample.unit && row.mes_referencia == sample.month);
        if !same_group {
            rows.push(FactRecursosRow::new(sample));
        }
        if let Some(row) = rows.last_mut() {
            row.set(sample.kind, sample.value);
        }
    }
    rows
}

pub fn write_dataset(
    dataset: &Dataset,
    out_dir: &Path,
) -> Result<Vec<TableReport>, GenerationError> {
    let students: Vec<DimAlunoRow<'_>> = dataset
        .students
        .iter()
        .map(|student| DimAlunoRow {
            id: student.id,
            nome_completo: &student.full_name,
            data_nascimento: student.birth_date,
            genero: student.gender.label(),
            cor_raca: student.ethnicity.label(),
            unidade: student.unit,
            segmento: student.segment.label(),
            turma: student.class_section,
            status_matricula: student.status.label(),
            data_matricula: student.enrolled_on,
            data_evasao: student.withdrawn_on,
            bolsista: student.scholarship,
            possui_irmaos: student.has_siblings,
            renda_familiar_sm: student.income.label(SchemaVariant::Bi),
            bairro: student.address.neighborhood,
            cidade: student.address.city,
            latitude: student.address.latitude,
            longitude: student.address.longitude,
        })
        .collect();

    let academic: Vec<FactAcademicoRow<'_>> = dataset
        .performance
        .iter()
        .map(|record| FactAcademicoRow {
            id: record.id,
            aluno_id: record.student_id,
            disciplina: record.subject,
            bimestre: record.period.bimester,
            ano: record.period.year,
            nota_bimestral: record.grade,
            faltas: record.absences,
            percentual_presenca: record.attendance,
            taxa_entrega_atividades: record.completion,
        })
        .collect();

    let revenue = dataset.finance.revenue.iter().map(|record| FactFinanceiroRow {
        id: record.id,
        aluno_id: Some(record.student_id),
        tipo: REVENUE_TAG,
        categoria: TUITION_CATEGORY,
        valor: record.amount,
        data_vencimento: record.due_date,
        data_pagamento: record.payment_date,
        status: record.status.label(),
        mes_referencia: record.reference_month,
        ano_referencia: record.reference_month.year(),
    });
    let expenses = dataset.finance.expenses.iter().map(|record| FactFinanceiroRow {
        id: record.id,
        aluno_id: None,
        tipo: EXPENSE_TAG,
        categoria: record.category,
        valor: record.amount,
        data_vencimento: record.due_date,
        data_pagamento: record.payment_date,
        status: record.status.label(),
        mes_referencia: record.reference_month,
        ano_referencia: record.reference_month.year(),
    });
    let finance: Vec<FactFinanceiroRow<'_>> = revenue.chain(expenses).collect();

    let tickets: Vec<FactTicketRow<'_>> = dataset
        .tickets
        .iter()
        .map(|ticket| FactTicketRow {
            id: ticket.id,
            unidade: ticket.unit,
            setor: ticket.sector,
            assunto: ticket.subject,
            prioridade: ticket.priority,
            status: ticket.status.label(),
            data_abertura: ticket.opened_at,
            data_resolucao: ticket.resolved_at,
            horas_ate_resolucao: ticket.elapsed_hours(),
        })
        .collect();

    let resources = pivot_resources(&dataset.metrics);

    let surveys: Vec<FactNpsRow<'_>> = dataset
        .surveys
        .iter()
        .map(|response| FactNpsRow {
            id: response.id,
            aluno_id: response.student_id,
            data_pesquisa: response.surveyed_on,
            nota_nps: response.score,
            health_score_familia: response.family_health,
            comentario: response.comment,
        })
        .collect();

    Ok(vec![
        write_table(out_dir, STUDENTS_FILE, &students)?,
        write_table(out_dir, ACADEMIC_FILE, &academic)?,
        write_table(out_dir, FINANCE_FILE, &finance)?,
        write_table(out_dir, TICKETS_FILE, &tickets)?,
        write_table(out_dir, RESOURCES_FILE, &resources)?,
        write_table(out_dir, SURVEY_FILE, &surveys)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::csv::write_records;

    use MetricValue::{Count, Measure};

    fn sample(unit: &'static str, month: u32, kind: MetricKind, value: MetricValue) -> MetricSample {
        MetricSample {
            id: Uuid::from_u128(u128::from(month) << 8 | value.as_f64() as u128),
            unit,
            month: NaiveDate::from_ymd_opt(2025, month, 1).unwrap(),
            kind,
            value,
        }
    }

    #[test]
    fn pivot_groups_consecutive_unit_months() {
        let samples = vec![
            sample("Centro", 2, MetricKind::EnergyConsumption, Measure(2500.5)),
            sample("Centro", 2, MetricKind::MealsServed, Count(4000)),
            sample("Sul", 2, MetricKind::EnergyConsumption, Measure(1800.0)),
            sample("Centro", 3, MetricKind::EnergyConsumption, Measure(2600.25)),
            sample("Centro", 3, MetricKind::Nps, Count(80)),
        ];
        let rows = pivot_resources(&samples);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id, samples[0].id);
        assert_eq!(rows[0].consumo_energia_kwh, Some(Measure(2500.5)));
        assert_eq!(rows[0].refeicoes_servidas, Some(Count(4000)));
        assert_eq!(rows[1].unidade, "Sul");
        assert_eq!(rows[1].refeicoes_servidas, None);
        assert_eq!(rows[2].consumo_energia_kwh, Some(Measure(2600.25)));
    }

    #[test]
    fn counts_are_written_without_a_fraction() {
        let rows = pivot_resources(&[
            sample("Norte", 4, MetricKind::MealsServed, Count(3120)),
            sample("Norte", 4, MetricKind::MealCost, Measure(12.5)),
        ]);
        let path = std::env::temp_dir().join(format!("schoolgen_bi_counts_{}.csv", Uuid::new_v4()));
        write_records(&path, &rows).expect("write csv");
        let contents = std::fs::read_to_string(&path).expect("read csv");

        let line = contents.lines().nth(1).expect("data row");
        assert!(line.contains(",3120,"), "{line}");
        assert!(line.contains(",12.5,"), "{line}");
        assert!(!line.contains("3120.0"));
    }
}
