use redfreelance::api::Service;
use redfreelance::confirm::ConfirmChoice;
use redfreelance::pages::{LandingPage, LandingState, ServiceForm, ServicesPage};

use super::*;

pub(super) fn handle_categories_command(env: &CliEnv, landing: bool, json: bool) -> Result<()> {
    let mut page = LandingPage::new(env.page()?);
    if !landing {
        let categories = page.category_list(&env.api);
        finish(env, &mut page)?;
        let categories = categories.unwrap_or_default();
        if json {
            return print_json(&categories, "categories");
        }
        for c in categories {
            println!("{}\t{}", c.id, c.name);
        }
        return Ok(());
    }

    page.load(&env.api);
    match page.state() {
        LandingState::Loaded(cards) if json => {
            let out: Vec<serde_json::Value> = cards
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "category": c.name,
                        "samples": c.samples.iter().map(|s| &s.title).collect::<Vec<_>>(),
                    })
                })
                .collect();
            print_json(&out, "landing categories")?;
        }
        LandingState::Loaded(cards) => {
            for card in cards {
                println!("{}", card.name);
                for s in &card.samples {
                    println!("  - {} ({:.2})", s.title, s.price);
                }
            }
        }
        LandingState::Empty => println!("No categories available."),
        LandingState::Loading | LandingState::Failed(_) => {}
    }
    finish(env, &mut page)
}

pub(super) fn handle_services_command(env: &CliEnv, command: ServicesCommands) -> Result<()> {
    match command {
        ServicesCommands::List {
            mine,
            category,
            search,
            json,
        } => {
            let mut page = ServicesPage::load(env.page()?, category, &env.api)?;
            if page.session().is_some() {
                if mine && !page.toggle_my_services(&env.api)? {
                    anyhow::bail!("--mine needs a freelancer or admin session");
                }
                if let Some(q) = search {
                    page.set_search(&env.api, q)?;
                }
            }
            finish(env, &mut page)?;

            let listing = page.listing();
            if json {
                let services: Vec<&Service> = listing.cards.iter().map(|c| &c.service).collect();
                return print_json(&services, "services");
            }
            println!("{}", listing.title);
            if listing.no_services {
                println!("No services available.");
            }
            for card in &listing.cards {
                print_service_line(&card.service, card.can_manage);
            }
        }
        ServicesCommands::Show { id, json } => {
            let mut page = ServicesPage::load(env.page()?, None, &env.api)?;
            let service = page.show_service(&env.api, id)?;
            finish(env, &mut page)?;
            let Some(service) = service else {
                return Ok(());
            };
            if json {
                return print_json(&service, "service");
            }
            println!("id: {}", service.id);
            println!("title: {}", service.title);
            println!("price: {:.2}", service.price);
            println!("categories: {}", service.category_names().join(", "));
            println!("owner: {}", service.owner_id);
            if !service.description.is_empty() {
                println!("description: {}", service.description);
            }
        }
        ServicesCommands::Create {
            title,
            description,
            price,
            categories,
        } => {
            let mut page = ServicesPage::load(env.page()?, None, &env.api)?;
            if page.session().is_some() {
                let all = page.categories().to_vec();
                let form = &mut page.create_form;
                form.title = title;
                form.description = description;
                form.price = price;
                select_categories(form, &all, &categories)?;
                page.create(&env.api)?;
                if let Some(err) = &page.create_form.error {
                    anyhow::bail!("{}", err);
                }
            }
            finish(env, &mut page)?;
        }
        ServicesCommands::Update {
            id,
            title,
            description,
            price,
            categories,
        } => {
            let mut page = ServicesPage::load(env.page()?, None, &env.api)?;
            if page.session().is_some() {
                page.open_manage(&env.api, id)?;
            }
            let all = page.categories().to_vec();
            if let Some(manage) = page.manage_mut() {
                let form = &mut manage.form;
                if let Some(t) = title {
                    form.title = t;
                }
                if let Some(d) = description {
                    form.description = d;
                }
                if let Some(p) = price {
                    form.price = p;
                }
                if !categories.is_empty() {
                    for id in form.picker.ids() {
                        form.picker.remove(id);
                    }
                    select_categories(form, &all, &categories)?;
                }
                page.update(&env.api)?;
                if let Some(err) = page.manage().and_then(|m| m.form.error.as_ref()) {
                    anyhow::bail!("{}", err);
                }
            }
            finish(env, &mut page)?;
        }
        ServicesCommands::Delete { id, yes } => {
            let mut page = ServicesPage::load(env.page()?, None, &env.api)?;
            if page.session().is_some() {
                page.open_manage(&env.api, id)?;
            }
            if page.request_delete() {
                let confirmed = yes
                    || match page.confirm().request() {
                        Some(req) => ask_yes_no(&req.title, &req.message)?,
                        None => false,
                    };
                let choice = if confirmed {
                    ConfirmChoice::Yes
                } else {
                    ConfirmChoice::No
                };
                page.resolve_confirmation(&env.api, choice)?;
                if choice == ConfirmChoice::No {
                    println!("Cancelled.");
                }
            }
            finish(env, &mut page)?;
        }
    }
    Ok(())
}

fn select_categories(
    form: &mut ServiceForm,
    all: &[redfreelance::api::Category],
    names: &[String],
) -> Result<()> {
    for name in names {
        if !form.picker.select_by_name(all, name) {
            anyhow::bail!("unknown category: {}", name);
        }
    }
    Ok(())
}

fn print_service_line(s: &Service, can_manage: bool) {
    let manage = if can_manage { " [manage]" } else { "" };
    println!(
        "{}\t{}\t{:.2}\t{}{}",
        s.id,
        s.title,
        s.price,
        s.category_names().join(", "),
        manage
    );
}
