//! Widget text in English, Hindi and Marathi.

use janseva_core::LocalizedText;

pub const TITLE: LocalizedText = LocalizedText::new("Ask JanSeva", "जनसेवा से पूछें", "जनसेवाला विचारा");

pub const SUBTITLE: LocalizedText = LocalizedText::new(
    "Get answers about government schemes",
    "सरकारी योजनाओं के बारे में जवाब पाएं",
    "सरकारी योजनांबद्दल उत्तरे मिळवा",
);

pub const PLACEHOLDER: LocalizedText = LocalizedText::new(
    "Ask about any scheme...",
    "किसी भी योजना के बारे में पूछें...",
    "कोणत्याही योजनेबद्दल विचारा...",
);

/// First assistant message of every session.
pub const GREETING: LocalizedText = LocalizedText::new(
    "Hello! I am JanSeva, your assistant for Maharashtra government schemes. Ask me about eligibility, documents, or how to apply for any scheme.",
    "नमस्ते! मैं जनसेवा हूं, महाराष्ट्र सरकार की योजनाओं के लिए आपका सहायक। मुझसे पात्रता, दस्तावेज, या किसी भी योजना के लिए आवेदन कैसे करें पूछें।",
    "नमस्कार! मी जनसेवा आहे, महाराष्ट्र सरकारच्या योजनांसाठी तुमचा सहाय्यक. मला पात्रता, कागदपत्रे किंवा कोणत्याही योजनेसाठी अर्ज कसा करायचा याबद्दल विचारा.",
);

/// Shown in place of a reply when the backend cannot be reached.
pub const OUT_OF_SCOPE: LocalizedText = LocalizedText::new(
    "I apologize, but I can only answer questions about Maharashtra government schemes. Please ask about eligibility, documents, benefits, or how to apply for specific schemes.",
    "क्षमा करें, मैं केवल महाराष्ट्र सरकार की योजनाओं के बारे में प्रश्नों का उत्तर दे सकता हूं। कृपया पात्रता, दस्तावेज, लाभ, या विशिष्ट योजनाओं के लिए आवेदन कैसे करें पूछें।",
    "माफ करा, मी फक्त महाराष्ट्र सरकारच्या योजनांबद्दल प्रश्नांची उत्तरे देऊ शकतो. कृपया पात्रता, कागदपत्रे, फायदे किंवा विशिष्ट योजनांसाठी अर्ज कसा करायचा याबद्दल विचारा.",
);

pub const VOICE_UNSUPPORTED: LocalizedText = LocalizedText::new(
    "Voice input not supported in this browser",
    "इस ब्राउज़र में आवाज इनपुट समर्थित नहीं है",
    "या ब्राउझरमध्ये आवाज इनपुट समर्थित नाही",
);

pub const SUGGESTED_HEADING: LocalizedText =
    LocalizedText::new("Suggested Questions", "सुझाए गए प्रश्न", "सुचवलेले प्रश्न");

pub const SUGGESTED_QUESTIONS: [LocalizedText; 3] = [
    LocalizedText::new(
        "Who can apply for Majhi Kanya Bhagyashree?",
        "माझी कन्या भाग्यश्री के लिए कौन आवेदन कर सकता है?",
        "माझी कन्या भाग्यश्रीसाठी कोण अर्ज करू शकते?",
    ),
    LocalizedText::new(
        "What documents are needed for health scheme?",
        "स्वास्थ्य योजना के लिए कौन से दस्तावेज चाहिए?",
        "आरोग्य योजनेसाठी कोणती कागदपत्रे लागतात?",
    ),
    LocalizedText::new(
        "How to get pension for senior citizens?",
        "वरिष्ठ नागरिकों के लिए पेंशन कैसे प्राप्त करें?",
        "ज्येष्ठ नागरिकांसाठी पेन्शन कसे मिळवायचे?",
    ),
];

pub const VOICE_INPUT: LocalizedText = LocalizedText::new("Voice Input", "आवाज इनपुट", "आवाज इनपुट");
pub const SEND: LocalizedText = LocalizedText::new("Send", "भेजें", "पाठवा");
pub const LISTEN: LocalizedText = LocalizedText::new("Listen", "सुनें", "ऐका");
pub const STOP: LocalizedText = LocalizedText::new("Stop", "रुकें", "थांबा");
