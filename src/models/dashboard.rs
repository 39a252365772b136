use serde::Serialize;
use utoipa::ToSchema;

// 1. Resumo de investimentos (os cards do topo do painel)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentSummary {
    pub total_investment: f64,   // Total aportado por todos os sócios
    pub user_contribution: f64,  // Quanto o usuário logado aportou
    pub user_percentage: f64,    // Participação do usuário (0..100)
}

// 2. Distribuição por sócio (gráfico de pizza)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartnerShare {
    pub name: String,
    pub amount: f64,
    pub percentage: f64,
}

// 3. Saldo de caixa, com a variante líquida usada pelas telas de controle
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashBalance {
    pub total_in: f64,
    pub total_out: f64,
    pub balance: f64,

    // Saldo menos dívidas pagas e gastos não planejados.
    pub net_balance: f64,
}

// 4. Série mensal para os gráficos de barra
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub entries_total: f64,
    pub expenses_total: f64,
    pub debts_total: f64,
}
