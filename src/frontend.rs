use crate::config::PageConfig;
use crate::logging::{self, log_event};
use crate::runtime;
use web_sys::window;
use yew::prelude::*;

const MOUNT_ID: &str = "app";
const BRAND: &str = "BotWork.tch";

struct Clause {
    heading: &'static str,
    body: &'static str,
}

struct TermsSection {
    id: &'static str,
    nav_label: &'static str,
    title: &'static str,
    clauses: &'static [Clause],
}

const SECTIONS: &[TermsSection] = &[
    TermsSection {
        id: "introduction",
        nav_label: "Introduction",
        title: "Introduction",
        clauses: &[
            Clause {
                heading: "Who we are",
                body: "BotWork.tch builds and hosts Discord bots for community servers.",
            },
            Clause {
                heading: "What these terms cover",
                body: "These terms apply whenever you invite, configure or interact with one of our bots.",
            },
        ],
    },
    TermsSection {
        id: "acceptance",
        nav_label: "Acceptance",
        title: "Acceptance of Terms",
        clauses: &[Clause {
            heading: "Agreeing to the terms",
            body: "Adding a bot to a server or using its commands means you accept these terms on behalf of yourself and the server.",
        }],
    },
    TermsSection {
        id: "usage",
        nav_label: "Usage",
        title: "Acceptable Use",
        clauses: &[
            Clause {
                heading: "Fair use",
                body: "Do not use the bots to spam, harass members or get around Discord's own rules.",
            },
            Clause {
                heading: "Rate limits",
                body: "Commands are rate limited per server. Deliberately flooding a bot may get the server blocked.",
            },
        ],
    },
    TermsSection {
        id: "privacy",
        nav_label: "Privacy",
        title: "Data & Privacy",
        clauses: &[Clause {
            heading: "What we store",
            body: "Only the server and user identifiers needed to run configured features. Message content is never stored.",
        }],
    },
    TermsSection {
        id: "liability",
        nav_label: "Liability",
        title: "Limitation of Liability",
        clauses: &[Clause {
            heading: "Provided as is",
            body: "The bots are offered without warranty. We are not liable for downtime, lost data or moderation decisions made with them.",
        }],
    },
    TermsSection {
        id: "changes",
        nav_label: "Changes",
        title: "Changes to These Terms",
        clauses: &[Clause {
            heading: "Updates",
            body: "We may revise these terms. Significant changes are announced in our support server before they take effect.",
        }],
    },
];

struct ContactChannel {
    icon: &'static str,
    label: &'static str,
    value: &'static str,
    href: &'static str,
}

const CONTACT_CHANNELS: &[ContactChannel] = &[
    ContactChannel {
        icon: "💬",
        label: "Support server",
        value: "discord.gg/botwork",
        href: "https://discord.gg/botwork",
    },
    ContactChannel {
        icon: "✉️",
        label: "Email",
        value: "legal@botwork.tch",
        href: "mailto:legal@botwork.tch",
    },
    ContactChannel {
        icon: "🛠️",
        label: "Issue tracker",
        value: "github.com/botwork-tch",
        href: "https://github.com/botwork-tch",
    },
];

/// Decorative shapes in the hero; `speed` feeds the parallax effect.
const FLOATING_SPEEDS: &[&str] = &["0.2", "0.5", "0.8"];

#[function_component(NavBar)]
fn nav_bar() -> Html {
    html! {
        <nav class="navbar">
            <div class="nav-container">
                <a class="nav-logo" href="#home">{BRAND}</a>
                <ul class="nav-menu" id="nav-menu">
                    { for SECTIONS.iter().map(|section| html! {
                        <li class="nav-item">
                            <a class="nav-link" href={format!("#{}", section.id)}>{section.nav_label}</a>
                        </li>
                    }) }
                    <li class="nav-item">
                        <a class="nav-link" href="#contact">{"Contact"}</a>
                    </li>
                </ul>
                <button class="nav-toggle" id="nav-toggle" type="button" aria-label="Toggle navigation">
                    <span class="bar"></span>
                    <span class="bar"></span>
                    <span class="bar"></span>
                </button>
            </div>
        </nav>
    }
}

#[function_component(Hero)]
fn hero() -> Html {
    html! {
        <header class="hero" id="home">
            { for FLOATING_SPEEDS.iter().enumerate().map(|(index, speed)| html! {
                <div class={format!("floating-element floating-{}", index + 1)} data-speed={*speed} aria-hidden="true"></div>
            }) }
            <h1 class="hero-title">
                <span class="gradient-text">{BRAND}</span>
                {" Terms of Service"}
            </h1>
            <p class="hero-subtitle">{"The rules for inviting and using our Discord bots."}</p>
            <div class="hero-scroll-indicator" aria-hidden="true">
                <span class="scroll-arrow">{"↓"}</span>
            </div>
        </header>
    }
}

#[function_component(Sections)]
fn sections() -> Html {
    html! {
        <>
            { for SECTIONS.iter().map(|section| html! {
                <section class="content-section" id={section.id}>
                    <h2 class="section-title">{section.title}</h2>
                    { for section.clauses.iter().map(|clause| html! {
                        <article class="content-card">
                            <h3>{clause.heading}</h3>
                            <p>{clause.body}</p>
                        </article>
                    }) }
                </section>
            }) }
        </>
    }
}

#[function_component(Contact)]
fn contact() -> Html {
    html! {
        <section class="content-section" id="contact">
            <h2 class="section-title">{"Contact"}</h2>
            <div class="contact-grid">
                { for CONTACT_CHANNELS.iter().map(|channel| html! {
                    <a class="contact-item" href={channel.href} target="_blank" rel="noopener noreferrer">
                        <span class="contact-icon" aria-hidden="true">{channel.icon}</span>
                        <span class="contact-label">{channel.label}</span>
                        <span class="contact-value">{channel.value}</span>
                    </a>
                }) }
            </div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct AppProps {
    config: PageConfig,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    {
        let config = props.config.clone();
        use_effect_with((), move |_| {
            runtime::install(config);
            || ()
        });
    }

    html! {
        <>
            <NavBar />
            <Hero />
            <main class="content">
                <Sections />
                <Contact />
            </main>
            <footer class="footer">
                <p>{format!("© {BRAND}. All rights reserved.")}</p>
            </footer>
        </>
    }
}

pub fn run() {
    let root = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(MOUNT_ID))
        .expect("missing #app mount point");

    let config = PageConfig::from_attributes(|name| root.get_attribute(name));
    logging::init(config.log_level);
    log_event(
        log::Level::Info,
        "page_config",
        serde_json::to_value(&config).unwrap_or_default(),
    );

    yew::Renderer::<App>::with_root_and_props(root, AppProps { config }).render();
}
