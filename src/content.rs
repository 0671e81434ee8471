//! Citizen-facing copy: landing page, privacy policy, confirmation prompts.

use serde::Serialize;

pub const CANCEL_PROMPT: &str = "Deseja realmente cancelar este agendamento?";
pub const ERASE_PROMPT: &str = "Você tem certeza que deseja solicitar o Direito ao Esquecimento? \
Todos os seus dados de agendamento serão removidos do sistema permanentemente.";
pub const ERASE_DONE: &str = "Seus dados foram excluídos conforme solicitado.";
pub const RATING_THANKS: &str = "Obrigado pela sua avaliação!";

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    pub title: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryPoint {
    pub label: &'static str,
    pub path: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub headline: &'static str,
    pub subtitle: &'static str,
    pub entry_points: &'static [EntryPoint],
    pub features_title: &'static str,
    pub features: &'static [Feature],
    pub warning: &'static str,
}

pub const HOME: HomePage = HomePage {
    headline: "Seu atendimento na UPA, agendado em minutos.",
    subtitle: "Evite filas presenciais. Escolha a unidade mais próxima, selecione o horário \
e receba seu comprovante digital na hora.",
    entry_points: &[
        EntryPoint {
            label: "Agendar Agora",
            path: "/api/booking",
        },
        EntryPoint {
            label: "Minhas Consultas",
            path: "/api/lookup",
        },
    ],
    features_title: "Por que usar o agendamento digital?",
    features: &[
        Feature {
            title: "Menos Tempo de Espera",
            text: "Chegue próximo ao horário agendado e reduza sua exposição a ambientes hospitalares.",
        },
        Feature {
            title: "Conformidade LGPD",
            text: "Seus dados são coletados com transparência e protegidos conforme a legislação vigente.",
        },
        Feature {
            title: "Acesso Localizado",
            text: "Encontre as UPAs mais próximas de sua residência em qualquer estado participante.",
        },
    ],
    warning: "Este sistema é para consultas eletivas de baixa complexidade. Em casos de dor no \
peito, falta de ar grave ou traumas graves, ligue para o 192 imediatamente.",
};

#[derive(Debug, Clone, Serialize)]
pub struct PolicySection {
    pub title: &'static str,
    pub paragraphs: &'static [&'static str],
    pub items: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct PrivacyPolicy {
    pub title: &'static str,
    pub sections: &'static [PolicySection],
    pub contact: &'static str,
}

pub const PRIVACY: PrivacyPolicy = PrivacyPolicy {
    title: "Política de Privacidade (LGPD)",
    sections: &[
        PolicySection {
            title: "1. Introdução",
            paragraphs: &["Este sistema de agendamento de Unidades de Pronto Atendimento (UPA) está \
comprometido com a transparência e a segurança dos dados dos cidadãos, operando em conformidade com \
a Lei Geral de Proteção de Dados (LGPD - Lei nº 13.709/2018)."],
            items: &[],
        },
        PolicySection {
            title: "2. Dados Coletados",
            paragraphs: &["Coletamos apenas o estritamente necessário para a finalidade de agendamento em saúde:"],
            items: &[
                "Nome Completo: Identificação do paciente na unidade.",
                "CPF: Validação junto ao sistema SUS e prevenção de fraudes.",
                "Telefone e E-mail: Comunicação de confirmação, avisos ou cancelamentos.",
                "Sintomas/Especialidade: Direcionamento para o serviço de saúde adequado.",
            ],
        },
        PolicySection {
            title: "3. Finalidade e Uso",
            paragraphs: &["Seus dados são utilizados exclusivamente para gerenciar sua fila de espera \
digital e garantir que a UPA escolhida tenha as informações básicas para o seu pré-atendimento. Não \
comercializamos nem compartilhamos seus dados com entidades privadas."],
            items: &[],
        },
        PolicySection {
            title: "4. Segurança",
            paragraphs: &["Utilizamos protocolos criptografados (HTTPS), controle rigoroso de logs de \
acesso e armazenamento seguro para proteger suas informações contra acessos não autorizados."],
            items: &[],
        },
        PolicySection {
            title: "5. Seus Direitos",
            paragraphs: &["Você possui o direito de:"],
            items: &[
                "Confirmar a existência de tratamento de dados.",
                "Acessar seus dados agendados.",
                "Corrigir dados incompletos ou inexatos.",
                "Direito ao Esquecimento: Solicitar a eliminação dos seus dados pessoais coletados \
após a conclusão ou cancelamento do atendimento.",
            ],
        },
    ],
    contact: "Para questões relativas à proteção de dados, entre em contato via dpo@saudedigital.gov.br.",
};
