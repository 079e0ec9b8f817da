// Prompt texts and response schemas sent to the generative service.

use serde_json::{json, Value};

pub(super) const SYSTEM_INSTRUCTION: &str = "\
Você é o assistente espiritual do aplicativo \"Caminho da Luz\", um guia cristão diário. \
Ajude o usuário a refletir, encontrar constância e fortalecer sua fé, baseando-se apenas \
nos ensinamentos da Bíblia Sagrada.

Nunca fale \"em nome de Deus\" nem apresente mensagens como revelações ou profecias. Você é \
um guia PARA a Palavra, não a voz de Deus. Toda orientação deve ser ancorada na Bíblia.

Sempre responda com os 5 pontos:
1. Empatia: uma frase curta, empática e acolhedora.
2. Reflexão bíblica: 3-5 frases conectando o que o usuário compartilhou com princípios bíblicos.
3. Versículo: um versículo profundamente conectado ao sentimento do usuário, com referência \
(ex: 'Filipenses 4:6-7') e texto.
4. Sugestão prática: uma oração, leitura ou atitude concreta, apresentada como convite.
5. Oração: uma oração curta (1-3 linhas).

Linguagem calma, respeitosa, acolhedora e humana. Evite jargões, polêmicas e diferenças \
doutrinárias. Nunca faça prescrições médicas ou julgamentos.

Se detectar sinais de sofrimento grave, responda com compaixão e inclua: \"É muito importante \
buscar ajuda em momentos de sofrimento intenso. Você não está sozinho(a). O CVV oferece apoio \
emocional gratuito e 24h no telefone 188. Por favor, considere ligar para eles.\"";

pub(super) fn title(entry_text: &str) -> String {
    format!(
        "Analise a seguinte entrada de diário e crie um único título curto e reflexivo, com 3 a 5 \
         palavras. Responda APENAS com o texto do título, sem introduções, números, aspas ou \
         formatação. Exemplo: 'Reflexões sobre a gratidão'. A entrada do diário é: \
         \"{entry_text}\""
    )
}

pub(super) const VERSE_OF_THE_DAY: &str = "Forneça um único versículo bíblico inspirador para \
ser o 'versículo do dia', como um objeto JSON com os campos 'ref' (a referência, ex: 'João \
3:16') e 'text' (o texto do versículo), sem formatação adicional.";

pub(super) fn faith_challenge(last_entry_text: &str) -> String {
    format!(
        "Baseado na seguinte reflexão de um diário espiritual, crie um pequeno desafio de fé, \
         prático e encorajador (1-2 frases). Responda APENAS com o texto do desafio. Exemplo: \
         \"Hoje, reserve 10 minutos para agradecer a Deus por algo simples.\" A reflexão é: \
         \"{last_entry_text}\""
    )
}

pub(super) fn weekly_insight(digest: &str) -> String {
    format!(
        "Analise as seguintes reflexões de diário de uma semana e gere um insight espiritual \
         curto (1-2 frases) que resuma o sentimento predominante. Exemplo: \"Esta semana você \
         demonstrou mais fé e confiança. Continue neste caminho.\" As reflexões são: \
         \"{digest}\""
    )
}

fn verse_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "ref": { "type": "STRING", "description": "A referência bíblica, ex: 'João 3:16'" },
            "text": { "type": "STRING", "description": "O texto do versículo." }
        },
        "required": ["ref", "text"]
    })
}

pub(super) fn reflection_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "empathy": {
                "type": "STRING",
                "description": "Uma frase curta, empática e acolhedora."
            },
            "reflection": {
                "type": "STRING",
                "description": "Uma reflexão prática e simples (3-5 frases) conectando com princípios bíblicos."
            },
            "verse": verse_schema(),
            "suggestion": {
                "type": "STRING",
                "description": "Uma pequena sugestão espiritual apresentada como um convite."
            },
            "prayer": {
                "type": "STRING",
                "description": "Uma oração curta (1-3 linhas)."
            }
        },
        "required": ["empathy", "reflection", "verse", "suggestion", "prayer"]
    })
}

pub(super) fn verse_of_the_day_schema() -> Value {
    verse_schema()
}
