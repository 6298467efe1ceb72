//! Flat tables imported by the dashboard application.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use crate::dataset::Dataset;
use crate::errors::GenerationError;
use crate::model::TableReport;
use crate::records::MetricValue;
use crate::output::write_table;
use crate::variant::SchemaVariant;

pub const SCHOOLS_FILE: &str = "escolas.csv";
pub const STUDENTS_FILE: &str = "alunos.csv";
pub const PERFORMANCE_FILE: &str = "desempenho_academico.csv";
pub const TUITION_FILE: &str = "financeiro_mensalidades.csv";
pub const EXPENSES_FILE: &str = "financeiro_despesas.csv";
pub const TICKETS_FILE: &str = "operacional_chamados.csv";
pub const METRICS_FILE: &str = "metricas_mensais.csv";

pub const TABLE_FILES: &[&str] = &[
    SCHOOLS_FILE,
    STUDENTS_FILE,
    PERFORMANCE_FILE,
    TUITION_FILE,
    EXPENSES_FILE,
    TICKETS_FILE,
    METRICS_FILE,
];

#[derive(Debug, Serialize)]
pub struct EscolaRow<'a> {
    pub id: Uuid,
    pub nome: &'a str,
    pub cidade: &'a str,
    pub estado: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AlunoRow<'a> {
    pub id: Uuid,
    pub escola_id: Option<Uuid>,
    pub nome_completo: &'a str,
    pub data_nascimento: NaiveDate,
    pub genero: &'a str,
    pub turma: &'a str,
    pub segmento: &'a str,
    pub unidade: &'a str,
    pub status_matricula: &'a str,
    pub cor_raca: &'a str,
    pub faixa_renda: &'a str,
    pub bolsista: bool,
    pub tem_irmaos: bool,
    pub cidade_aluno: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub data_matricula: NaiveDate,
    pub data_evasao: Option<NaiveDate>,
    pub cep: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DesempenhoRow<'a> {
    pub id: Uuid,
    pub aluno_id: Uuid,
    pub disciplina: &'a str,
    pub media_final: f64,
    pub percentual_presenca: f64,
    pub taxa_entrega_atividades: f64,
    pub bimestre: u8,
    pub ano_letivo: i32,
}

#[derive(Debug, Serialize)]
pub struct MensalidadeRow<'a> {
    pub id: Uuid,
    pub aluno_id: Uuid,
    pub mes_referencia: NaiveDate,
    pub valor: f64,
    pub status_pagamento: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DespesaRow<'a> {
    pub id: Uuid,
    pub categoria: &'a str,
    pub descricao: &'a str,
    pub valor: f64,
    pub data_despesa: NaiveDate,
    pub status: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChamadoRow<'a> {
    pub id: Uuid,
    pub categoria: &'a str,
    pub descricao: &'a str,
    pub prioridade: &'a str,
    pub status: &'a str,
    pub data_abertura: NaiveDateTime,
    pub data_resolucao: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
pub struct MetricaRow<'a> {
    pub id: Uuid,
    pub mes_referencia: NaiveDate,
    pub unidade_escolar: &'a str,
    pub tipo_metrica: &'a str,
    pub valor: MetricValue,
    pub unidade: &'a str,
}

pub fn write_dataset(
    dataset: &Dataset,
    out_dir: &Path,
) -> Result<Vec<TableReport>, GenerationError> {
    let schools: Vec<EscolaRow<'_>> = dataset
        .schools
        .iter()
        .map(|school| EscolaRow {
            id: school.id,
            nome: school.name,
            cidade: school.city,
            estado: school.state,
        })
        .collect();

    let students: Vec<AlunoRow<'_>> = dataset
        .students
        .iter()
        .map(|student| AlunoRow {
            id: student.id,
            escola_id: student.school_id,
            nome_completo: &student.full_name,
            data_nascimento: student.birth_date,
            genero: student.gender.label(),
            turma: student.class_section,
            segmento: student.segment.label(),
            unidade: student.unit,
            status_matricula: student.status.label(),
            cor_raca: student.ethnicity.label(),
            faixa_renda: student.income.label(SchemaVariant::App),
            bolsista: student.scholarship,
            tem_irmaos: student.has_siblings,
            cidade_aluno: student.address.city,
            latitude: student.address.latitude,
            longitude: student.address.longitude,
            data_matricula: student.enrolled_on,
            data_evasao: student.withdrawn_on,
            cep: &student.address.postal_code,
        })
        .collect();

    let performance: Vec<DesempenhoRow<'_>> = dataset
        .performance
        .iter()
        .map(|record| DesempenhoRow {
            id: record.id,
            aluno_id: record.student_id,
            disciplina: record.subject,
            media_final: record.grade,
            percentual_presenca: record.attendance,
            taxa_entrega_atividades: record.completion,
            bimestre: record.period.bimester,
            ano_letivo: record.period.year,
        })
        .collect();

    let tuition: Vec<MensalidadeRow<'_>> = dataset
        .finance
        .revenue
        .iter()
        .map(|record| MensalidadeRow {
            id: record.id,
            aluno_id: record.student_id,
            mes_referencia: record.reference_month,
            valor: record.amount,
            status_pagamento: record.status.label(),
        })
        .collect();

    let expenses: Vec<DespesaRow<'_>> = dataset
        .finance
        .expenses
        .iter()
        .map(|record| DespesaRow {
            id: record.id,
            categoria: record.category,
            descricao: &record.description,
            valor: record.amount,
            data_despesa: record.due_date,
            status: record.status.label(),
        })
        .collect();

    let tickets: Vec<ChamadoRow<'_>> = dataset
        .tickets
        .iter()
        .map(|ticket| ChamadoRow {
            id: ticket.id,
            categoria: ticket.sector,
            descricao: ticket.subject,
            prioridade: ticket.priority,
            status: ticket.status.label(),
            data_abertura: ticket.opened_at,
            data_resolucao: ticket.resolved_at,
        })
        .collect();

    let metrics: Vec<MetricaRow<'_>> = dataset
        .metrics
        .iter()
        .map(|sample| MetricaRow {
            id: sample.id,
            mes_referencia: sample.month,
            unidade_escolar: sample.unit,
            tipo_metrica: sample.kind.code(),
            valor: sample.value,
            unidade: sample.kind.unit_tag(),
        })
        .collect();

    Ok(vec![
        write_table(out_dir, SCHOOLS_FILE, &schools)?,
        write_table(out_dir, STUDENTS_FILE, &students)?,
        write_table(out_dir, PERFORMANCE_FILE, &performance)?,
        write_table(out_dir, TUITION_FILE, &tuition)?,
        write_table(out_dir, EXPENSES_FILE, &expenses)?,
        write_table(out_dir, TICKETS_FILE, &tickets)?,
        write_table(out_dir, METRICS_FILE, &metrics)?,
    ])
}
